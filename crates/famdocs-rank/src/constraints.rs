//! Structured constraints hidden in free-form questions.
//!
//! Two kinds are recognised: a numeric inequality ("SGPA less than 8.5") and
//! document selectors ("Sem-1 and Sem-4"). Extraction is best-effort and
//! never fails a query.

use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
}

impl Comparison {
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Less => value < threshold,
            Comparison::Greater => value > threshold,
            Comparison::LessOrEqual => value <= threshold,
            Comparison::GreaterOrEqual => value >= threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::Greater => ">",
            Comparison::LessOrEqual => "<=",
            Comparison::GreaterOrEqual => ">=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for Comparison {
    type Err = famdocs_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Comparison::Less),
            ">" => Ok(Comparison::Greater),
            "<=" => Ok(Comparison::LessOrEqual),
            ">=" => Ok(Comparison::GreaterOrEqual),
            other => Err(famdocs_core::Error::InvalidInput(format!("unknown comparison '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inequality {
    pub op: Comparison,
    pub threshold: f64,
}

impl Inequality {
    pub fn new(op: Comparison, threshold: f64) -> Self {
        Self { op, threshold }
    }

    pub fn holds(&self, value: f64) -> bool {
        self.op.holds(value, self.threshold)
    }
}

impl fmt::Display for Inequality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.threshold)
    }
}

/// Constraints derived once per query; immutable afterwards.
/// An empty selector set means "no restriction".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryConstraints {
    pub inequality: Option<Inequality>,
    pub selectors: BTreeSet<u32>,
}

impl QueryConstraints {
    pub fn from_query(query: &str) -> Self {
        Self {
            inequality: extract_inequality(query),
            selectors: extract_selectors(query),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.inequality.is_none() && self.selectors.is_empty()
    }
}

// Priority order matters: phrase forms first, then "<=" / ">=" before the
// bare "<" / ">" they would otherwise be read as.
const INEQUALITY_PATTERNS: &[(&str, Comparison)] = &[
    (r"less than\s*([0-9][0-9.]*)", Comparison::Less),
    (r"greater than\s*([0-9][0-9.]*)", Comparison::Greater),
    (r"below\s*([0-9][0-9.]*)", Comparison::Less),
    (r"above\s*([0-9][0-9.]*)", Comparison::Greater),
    (r"<=\s*([0-9][0-9.]*)", Comparison::LessOrEqual),
    (r">=\s*([0-9][0-9.]*)", Comparison::GreaterOrEqual),
    (r"<\s*([0-9][0-9.]*)", Comparison::Less),
    (r">\s*([0-9][0-9.]*)", Comparison::Greater),
];

fn inequality_res() -> &'static [(Regex, Comparison)] {
    static RES: OnceLock<Vec<(Regex, Comparison)>> = OnceLock::new();
    RES.get_or_init(|| {
        INEQUALITY_PATTERNS
            .iter()
            .map(|(p, op)| (Regex::new(p).expect("static regex"), *op))
            .collect()
    })
}

fn selector_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:semester|sem|document|doc|part)[\s\-_#:.]*(\d+)").expect("static regex")
    })
}

/// First inequality found in `query`, trying patterns in priority order.
///
/// A threshold that does not parse as a number (e.g. `1.2.3`) discards that
/// match and the search continues with the next pattern.
pub fn extract_inequality(query: &str) -> Option<Inequality> {
    let lowered = query.to_lowercase();
    for (re, op) in inequality_res() {
        let Some(caps) = re.captures(&lowered) else { continue };
        let raw = caps.get(1).map_or("", |m| m.as_str());
        // a sentence-ending period is not part of the number
        let literal = raw.trim_end_matches('.');
        match literal.parse::<f64>() {
            Ok(threshold) => return Some(Inequality::new(*op, threshold)),
            Err(_) => debug!(threshold = raw, op = %op, "discarding malformed inequality threshold"),
        }
    }
    None
}

/// Integers that directly follow one of the anchors `sem`, `semester`,
/// `document`, `doc` or `part`. Bare numbers elsewhere are ignored so GPA
/// values and dates in the question never become selectors.
pub fn extract_selectors(query: &str) -> BTreeSet<u32> {
    let lowered = query.to_lowercase();
    selector_re()
        .captures_iter(&lowered)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .collect()
}
