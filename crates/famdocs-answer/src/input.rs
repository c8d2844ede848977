//! Parsing of tool invocations coming from the agent layer.
//!
//! Two shapes are accepted:
//! - `query="Sem-2 SGPA", top_k=5`
//! - `{"query": "Sem-2 SGPA", "top_k": 5}`

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use famdocs_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInput {
    pub query: String,
    /// `0` means "use the default".
    pub top_k: usize,
}

#[derive(Deserialize)]
struct JsonInput {
    query: Option<String>,
    top_k: Option<serde_json::Value>,
}

fn pair_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?P<key>[A-Za-z_]+)\s*=\s*(?:"(?P<quoted>[^"]*)"|(?P<bare>[^,]*))"#).expect("static regex")
    })
}

impl ToolInput {
    pub fn new(query: impl Into<String>, top_k: usize) -> Self {
        Self { query: query.into(), top_k }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (query, top_k) = if trimmed.starts_with('{') {
            let raw: JsonInput = serde_json::from_str(trimmed)
                .map_err(|e| Error::InvalidInput(format!("malformed JSON tool input: {e}")))?;
            (raw.query, raw.top_k.as_ref().map_or(0, top_k_from_json))
        } else {
            parse_pairs(trimmed)
        };
        let query = query.map(|q| q.trim().to_string()).unwrap_or_default();
        if query.is_empty() {
            return Err(Error::InvalidInput("query is required".into()));
        }
        Ok(Self { query, top_k })
    }
}

fn parse_pairs(input: &str) -> (Option<String>, usize) {
    let mut query = None;
    let mut top_k = 0;
    let mut saw_pair = false;
    for caps in pair_re().captures_iter(input) {
        saw_pair = true;
        let value = caps
            .name("quoted")
            .or_else(|| caps.name("bare"))
            .map_or("", |m| m.as_str())
            .trim()
            .trim_matches('"');
        match &caps["key"] {
            "query" => query = Some(value.to_string()),
            "top_k" => top_k = top_k_from_str(value),
            _ => {}
        }
    }
    if !saw_pair {
        // plain text: the whole input is the question
        return (Some(input.trim_matches('"').to_string()), 0);
    }
    (query, top_k)
}

fn top_k_from_str(value: &str) -> usize {
    value.parse::<i64>().ok().filter(|k| *k > 0).map_or(0, |k| k as usize)
}

fn top_k_from_json(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Number(n) => n.as_i64().filter(|k| *k > 0).map_or(0, |k| k as usize),
        serde_json::Value::String(s) => top_k_from_str(s.trim()),
        _ => 0,
    }
}
