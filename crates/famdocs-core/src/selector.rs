//! Integer selectors embedded in document filenames.
//!
//! Family documents are named like `Sem-2.pdf` or `Part 3 - Report.txt`; the
//! integers in those names are what queries such as "semester 2" select on.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::SelectorTags;

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

/// Every integer literal that appears anywhere in `filename`.
/// Literals too large for `u32` are skipped.
pub fn filename_selector_tags(filename: &str) -> SelectorTags {
    integer_re()
        .find_iter(filename)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_up_every_integer() {
        let tags = filename_selector_tags("Sem-2 part 10.pdf");
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec![2, 10]);
    }

    #[test]
    fn no_digits_no_tags() {
        assert!(filename_selector_tags("insurance.pdf").is_empty());
    }

    #[test]
    fn oversized_literal_is_ignored() {
        let tags = filename_selector_tags("scan-99999999999-1.pdf");
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec![1]);
    }
}
