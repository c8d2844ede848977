//! Turns source files into chunked documents ready for embedding.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::ChunkingSettings;
use crate::error::{Error, Result};
use crate::selector::filename_selector_tags;
use crate::types::{DocumentChunk, DocumentMetadata, DocumentStatus};

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Sender details carried alongside an ingested file.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    pub sender: String,
    pub subject: String,
}

#[derive(Debug, Clone)]
pub struct IngestedDocument {
    pub metadata: DocumentMetadata,
    pub chunks: Vec<DocumentChunk>,
}

#[derive(Default)]
pub struct DataProcessor {
    chunking: ChunkingSettings,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_chunking(chunking: ChunkingSettings) -> Result<Self> {
        if chunking.size == 0 || chunking.overlap >= chunking.size {
            return Err(Error::InvalidConfig(format!(
                "chunk overlap {} must be smaller than chunk size {}",
                chunking.overlap, chunking.size
            )));
        }
        Ok(Self { chunking })
    }

    pub fn process_directory(&self, data_dir: &Path, provenance: &Provenance) -> Result<Vec<IngestedDocument>> {
        let files = self.list_source_files(data_dir);
        if files.is_empty() {
            warn!(dir = %data_dir.display(), "no ingestible files found");
            return Ok(vec![]);
        }
        let mut documents = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            debug!(file = %file_path.display(), "processing file {}/{}", file_index + 1, files.len());
            if let Some(doc) = self.process_file(file_path, provenance)? {
                documents.push(doc);
            }
        }
        let chunk_total: usize = documents.iter().map(|d| d.chunks.len()).sum();
        info!(files = files.len(), documents = documents.len(), chunks = chunk_total, "processed directory");
        Ok(documents)
    }

    /// Returns `None` for files with no extractable text.
    pub fn process_file(&self, file_path: &Path, provenance: &Provenance) -> Result<Option<IngestedDocument>> {
        let content = read_file_content(file_path)?;
        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| Error::InvalidInput(format!("{} has no file name", file_path.display())))?;
        let doc = self.process_text(&filename, &content, provenance);
        if doc.is_none() {
            warn!(file = %file_path.display(), "skipping file without text");
        }
        Ok(doc)
    }

    pub fn process_text(&self, filename: &str, content: &str, provenance: &Provenance) -> Option<IngestedDocument> {
        let document_id = document_id_for(filename, content);
        let selector_tags = filename_selector_tags(filename);
        let pieces: Vec<String> = chunk_text(content, self.chunking.size, self.chunking.overlap)
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();
        if pieces.is_empty() {
            return None;
        }
        let total_chunks = pieces.len();
        let chunks = pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| DocumentChunk {
                id: format!("{}:{}", document_id, chunk_index),
                document_id: document_id.clone(),
                filename: filename.to_string(),
                content,
                chunk_index,
                total_chunks,
                selector_tags: selector_tags.clone(),
            })
            .collect();
        let metadata = DocumentMetadata {
            document_id,
            filename: filename.to_string(),
            sender: provenance.sender.clone(),
            subject: provenance.subject.clone(),
            received_at: Utc::now(),
            status: DocumentStatus::Received,
            chunk_count: total_chunks,
        };
        Some(IngestedDocument { metadata, chunks })
    }

    fn list_source_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        files.sort();
        files
    }
}

fn read_file_content(file_path: &Path) -> Result<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
    }
}

/// Stable identity for a document: the same file ingested twice maps to the
/// same id, so re-ingesting replaces instead of duplicating.
pub fn document_id_for(filename: &str, content: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(filename.as_bytes());
    hasher.update(&[0]);
    hasher.update(content.as_bytes());
    hasher.finalize().to_hex()[..32].to_string()
}

/// Sliding character window: windows of `size` characters starting every
/// `size - overlap` characters until the start passes the end of `text`.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if size == 0 {
        return vec![];
    }
    let chars: Vec<char> = text.chars().collect();
    let step = size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_advances_by_size_minus_overlap() {
        let text: String = "abcdefghij".into();
        let chunks = chunk_text(&text, 4, 1);
        assert_eq!(chunks, vec!["abcd", "defg", "ghij", "j"]);
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_text("SGPA 8.12", 1000, 200), vec!["SGPA 8.12"]);
        assert!(chunk_text("", 1000, 200).is_empty());
    }

    #[test]
    fn splits_on_char_boundaries() {
        let chunks = chunk_text("ééééé", 2, 0);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn document_id_is_stable_and_content_sensitive() {
        let a = document_id_for("Sem-2.pdf", "SGPA 8.12");
        assert_eq!(a, document_id_for("Sem-2.pdf", "SGPA 8.12"));
        assert_ne!(a, document_id_for("Sem-2.pdf", "SGPA 9.00"));
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn process_text_tags_chunks_from_filename() {
        let processor = DataProcessor::new();
        let doc = processor
            .process_text("Sem-2.pdf", "SGPA 8.12 Roll No 23123031006", &Provenance::default())
            .expect("document");
        assert_eq!(doc.chunks.len(), 1);
        assert_eq!(doc.metadata.status, DocumentStatus::Received);
        assert!(doc.chunks[0].selector_tags.contains(&2));
        assert_eq!(doc.chunks[0].id, format!("{}:0", doc.metadata.document_id));
    }

    #[test]
    fn whitespace_only_text_yields_no_document() {
        assert!(DataProcessor::new().process_text("blank.txt", "  \n\n ", &Provenance::default()).is_none());
    }

    #[test]
    fn invalid_chunking_is_rejected() {
        let bad = ChunkingSettings { size: 10, overlap: 10 };
        assert!(DataProcessor::with_chunking(bad).is_err());
    }
}
