use std::collections::HashMap;

use famdocs_core::types::Chunk;
use famdocs_core::{Error, Result};

/// Scored chunks of one source document, keyed by filename.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentGroup {
    pub filename: String,
    /// Chunk texts in arrival order.
    pub texts: Vec<String>,
    pub score: f64,
}

impl DocumentGroup {
    fn new(filename: &str) -> Self {
        Self { filename: filename.to_string(), texts: Vec::new(), score: 0.0 }
    }

    pub fn context(&self, separator: &str) -> String {
        self.texts.join(separator)
    }
}

/// Groups chunks by filename, summing relevance scores. Groups come back in
/// order of first appearance; no cap on chunks per group.
pub fn group(chunks: &[Chunk]) -> Vec<DocumentGroup> {
    let mut groups: Vec<DocumentGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for chunk in chunks {
        let slot = *index.entry(chunk.filename.as_str()).or_insert_with(|| {
            groups.push(DocumentGroup::new(&chunk.filename));
            groups.len() - 1
        });
        let g = &mut groups[slot];
        g.texts.push(chunk.text.clone());
        g.score += chunk.relevance_score;
    }
    groups
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Confidence of each group relative to the best one, rounded to three
/// decimals. Every group tied at the maximum gets exactly 1.0.
///
/// `groups` must be non-empty. When every group scored 0 they are all tied
/// at the maximum and all get 1.0.
pub fn normalize(groups: &[DocumentGroup]) -> Result<Vec<(String, f64)>> {
    let max_score = groups
        .iter()
        .map(|g| g.score)
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |m| m.max(s))))
        .ok_or(Error::EmptyGroups)?;

    Ok(groups
        .iter()
        .map(|g| {
            let confidence = if max_score > 0.0 { round3(g.score / max_score) } else { 1.0 };
            (g.filename.clone(), confidence)
        })
        .collect())
}
