use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use famdocs_core::selector::filename_selector_tags;
use famdocs_core::types::Chunk;

use crate::constraints::{Comparison, Inequality, QueryConstraints};

fn numeric_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\d+|\d+").expect("static regex"))
}

/// Numeric literals in `text`, decimals first-class (`8.12` is one value).
pub fn numeric_literals(text: &str) -> impl Iterator<Item = f64> + '_ {
    numeric_literal_re()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
}

pub fn count_numeric_literals(text: &str) -> usize {
    numeric_literal_re().find_iter(text).count()
}

pub fn filename_satisfies_selectors(filename: &str, selectors: &BTreeSet<u32>) -> bool {
    selectors.is_empty() || !filename_selector_tags(filename).is_disjoint(selectors)
}

pub fn satisfies_inequality(text: &str, op: Comparison, threshold: f64) -> bool {
    numeric_literals(text).any(|v| op.holds(v, threshold))
}

/// Selector test for a retrieved chunk. Persisted tags are authoritative;
/// chunks without them fall back to parsing the filename.
pub fn chunk_satisfies_selectors(chunk: &Chunk, selectors: &BTreeSet<u32>) -> bool {
    if selectors.is_empty() {
        return true;
    }
    let tags: Cow<'_, BTreeSet<u32>> = match &chunk.selector_tags {
        Some(tags) => Cow::Borrowed(tags),
        None => Cow::Owned(filename_selector_tags(&chunk.filename)),
    };
    !tags.is_disjoint(selectors)
}

pub fn chunk_satisfies_inequality(chunk: &Chunk, inequality: Option<&Inequality>) -> bool {
    inequality.map_or(true, |i| satisfies_inequality(&chunk.text, i.op, i.threshold))
}

pub fn passes(chunk: &Chunk, constraints: &QueryConstraints) -> bool {
    chunk_satisfies_selectors(chunk, &constraints.selectors)
        && chunk_satisfies_inequality(chunk, constraints.inequality.as_ref())
}

/// Keeps the chunks that pass both tests, preserving their relative order.
pub fn apply(chunks: Vec<Chunk>, constraints: &QueryConstraints) -> Vec<Chunk> {
    chunks.into_iter().filter(|c| passes(c, constraints)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(xs: &[u32]) -> BTreeSet<u32> {
        xs.iter().copied().collect()
    }

    #[test]
    fn filename_selectors() {
        assert!(filename_satisfies_selectors("Sem-2.pdf", &set(&[2])));
        assert!(!filename_satisfies_selectors("Sem-2.pdf", &set(&[4])));
        assert!(filename_satisfies_selectors("Sem-2.pdf", &set(&[])));
        assert!(filename_satisfies_selectors("Sem-4.pdf", &set(&[1, 4])));
    }

    #[test]
    fn inequality_against_text() {
        assert!(satisfies_inequality("SGPA: 8.12", Comparison::Less, 9.0));
        assert!(!satisfies_inequality("SGPA: 8.12", Comparison::Greater, 9.0));
        assert!(!satisfies_inequality("no numbers here", Comparison::Greater, 0.0));
        assert!(satisfies_inequality("grade 9", Comparison::GreaterOrEqual, 9.0));
    }

    #[test]
    fn numeric_literals_keep_decimals_whole() {
        let found: Vec<f64> = numeric_literals("SGPA 8.12 Roll No 23123031006").collect();
        assert_eq!(found, vec![8.12, 23_123_031_006.0]);
        assert_eq!(count_numeric_literals("v1.2.3"), 2);
    }

    #[test]
    fn persisted_tags_take_precedence_over_filename() {
        let tagged = Chunk::new("d", "Sem-2.pdf", "SGPA 8.12", 0.9).with_selector_tags(set(&[4]));
        assert!(chunk_satisfies_selectors(&tagged, &set(&[4])));
        assert!(!chunk_satisfies_selectors(&tagged, &set(&[2])));

        let untagged = Chunk::new("d", "Sem-2.pdf", "SGPA 8.12", 0.9);
        assert!(chunk_satisfies_selectors(&untagged, &set(&[2])));
    }

    #[test]
    fn apply_drops_failures_and_keeps_order() {
        let chunks = vec![
            Chunk::new("a", "Sem-1.pdf", "SGPA 7.10", 0.1),
            Chunk::new("b", "Sem-2.pdf", "SGPA 9.40", 0.2),
            Chunk::new("c", "Sem-4.pdf", "SGPA 6.00", 0.3),
            Chunk::new("d", "Sem-4.pdf", "SGPA 9.90", 0.4),
        ];
        let constraints = QueryConstraints {
            inequality: Some(Inequality::new(Comparison::Less, 8.0)),
            selectors: set(&[1, 4]),
        };
        let kept: Vec<_> = apply(chunks, &constraints).into_iter().map(|c| c.document_id).collect();
        assert_eq!(kept, vec!["a", "c"]);
    }
}
