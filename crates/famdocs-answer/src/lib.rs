//! famdocs-answer
//!
//! Caller-facing layer over the ranking core: parses tool input, runs
//! retrieval, hands the assembled context to a [`Summarizer`] and renders
//! the response.
//!
//! [`Summarizer`]: famdocs_core::traits::Summarizer

pub mod input;
pub mod render;
pub mod summarize;
pub mod tool;

pub use input::ToolInput;
pub use render::metadata_table;
pub use summarize::ExtractiveSummarizer;
pub use tool::{Answer, SearchTool};
