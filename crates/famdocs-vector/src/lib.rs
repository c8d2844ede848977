//! famdocs-vector
//!
//! In-process vector store: chunks, their embeddings and per-document
//! metadata, searched by brute-force cosine similarity and persisted as a
//! single JSON snapshot.

pub mod store;

pub use store::{MemoryVectorStore, StoredChunk};
