//! Domain types shared by ingestion, the vector store and the ranking core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type ChunkId = String;
pub type DocumentId = String;

/// Integer selectors a document answers to (e.g. the `2` in `Sem-2.pdf`).
pub type SelectorTags = BTreeSet<u32>;

/// A stored slice of a source document.
///
/// - `id`: `<document_id>:<chunk_index>`
/// - `document_id`: stable identity of the source document
/// - `filename`: display name of the source document
/// - `content`: the text payload of the chunk
/// - `selector_tags`: integers parsed from `filename` once, at ingest time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub document_id: DocumentId,
    pub filename: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    #[serde(default)]
    pub selector_tags: SelectorTags,
}

/// A chunk as returned by the vector-search collaborator.
///
/// `similarity_score` is informational; ranking uses `relevance_score`,
/// which stays 0 until the chunk has been scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub document_id: DocumentId,
    pub filename: String,
    pub text: String,
    pub similarity_score: f32,
    #[serde(default)]
    pub relevance_score: f64,
    /// Persisted selector tags. `None` means the filename has to be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector_tags: Option<SelectorTags>,
}

impl Chunk {
    pub fn new(
        document_id: impl Into<String>,
        filename: impl Into<String>,
        text: impl Into<String>,
        similarity_score: f32,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            filename: filename.into(),
            text: text.into(),
            similarity_score,
            relevance_score: 0.0,
            selector_tags: None,
        }
    }

    #[must_use]
    pub fn with_selector_tags(mut self, tags: SelectorTags) -> Self {
        self.selector_tags = Some(tags);
        self
    }
}

impl From<(&DocumentChunk, f32)> for Chunk {
    fn from((c, similarity): (&DocumentChunk, f32)) -> Self {
        Chunk::new(c.document_id.clone(), c.filename.clone(), c.content.clone(), similarity)
            .with_selector_tags(c.selector_tags.clone())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Received,
    Indexed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Received => f.write_str("RECEIVED"),
            DocumentStatus::Indexed => f.write_str("INDEXED"),
        }
    }
}

/// Bookkeeping for an ingested document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    pub document_id: DocumentId,
    pub filename: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub subject: String,
    pub received_at: DateTime<Utc>,
    pub status: DocumentStatus,
    #[serde(default)]
    pub chunk_count: usize,
}

/// Assembled context and confidence for one source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentContext {
    pub filename: String,
    pub context: String,
    pub confidence: f64,
    pub score: f64,
    pub chunk_count: usize,
}

/// Outcome of one retrieval. The two empty variants are normal results, not
/// failures: `AllFiltered` lets callers suggest loosening the constraints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetrievalResult {
    NoCandidates,
    AllFiltered { candidates: usize },
    Documents { documents: Vec<DocumentContext> },
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        !matches!(self, RetrievalResult::Documents { documents } if !documents.is_empty())
    }

    pub fn documents(&self) -> &[DocumentContext] {
        match self {
            RetrievalResult::Documents { documents } => documents,
            _ => &[],
        }
    }

    pub fn get(&self, filename: &str) -> Option<&DocumentContext> {
        self.documents().iter().find(|d| d.filename == filename)
    }
}
