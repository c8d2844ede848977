//! famdocs-rank
//!
//! Constrained retrieval and ranking over vector-search candidates:
//!
//! ```text
//! query -> VectorSearch -> chunks -> filter (selectors, inequality)
//!       -> lexical score -> group by filename -> confidence
//! ```

pub mod constraints;
pub mod filter;
pub mod group;
pub mod retrieve;
pub mod score;
pub mod tokenize;

pub use constraints::{extract_inequality, extract_selectors, Comparison, Inequality, QueryConstraints};
pub use filter::{filename_satisfies_selectors, satisfies_inequality};
pub use group::{group, normalize, DocumentGroup};
pub use retrieve::{RetrievalOptions, Retriever, DEFAULT_TOP_K};
pub use score::score;
pub use tokenize::tokenize;
