//! Lexical relevance score, computed independently of the embedding
//! similarity so that noisy vector matches can be corrected.

use std::collections::HashSet;

use crate::filter::count_numeric_literals;
use crate::tokenize::tokenize;

const OVERLAP_WEIGHT: f64 = 3.0;
const TOKEN_DENSITY_WEIGHT: f64 = 8.0;
const NUMERIC_DENSITY_WEIGHT: f64 = 5.0;

/// `(overlap*3 + token_density*8 + numeric_density*5) / ln(|C| + 1)`
///
/// - `overlap`: share of distinct query tokens present in the chunk
/// - `token_density`: share of chunk tokens that are query tokens
/// - `numeric_density`: numeric literals in the raw chunk text per chunk token
///
/// Returns 0 when either side has no tokens.
pub fn score(query: &str, chunk_text: &str) -> f64 {
    let q_tokens = tokenize(query);
    let c_tokens = tokenize(chunk_text);
    if q_tokens.is_empty() || c_tokens.is_empty() {
        return 0.0;
    }

    let q_set: HashSet<&str> = q_tokens.iter().map(String::as_str).collect();
    let c_set: HashSet<&str> = c_tokens.iter().map(String::as_str).collect();
    let c_len = c_tokens.len() as f64;

    let overlap = q_set.intersection(&c_set).count() as f64 / q_set.len() as f64;
    let token_density = c_tokens.iter().filter(|t| q_set.contains(t.as_str())).count() as f64 / c_len;
    let numeric_density = count_numeric_literals(chunk_text) as f64 / c_len;
    let length_penalty = (c_len + 1.0).ln();

    (overlap * OVERLAP_WEIGHT + token_density * TOKEN_DENSITY_WEIGHT + numeric_density * NUMERIC_DENSITY_WEIGHT)
        / length_penalty
}
