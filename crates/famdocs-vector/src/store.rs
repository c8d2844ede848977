use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use famdocs_core::ingest::IngestedDocument;
use famdocs_core::traits::{Embedder, VectorSearch};
use famdocs_core::types::{Chunk, DocumentChunk, DocumentMetadata, DocumentStatus};
use famdocs_core::{Error, Result};
use famdocs_embed::cosine_similarity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub chunk: DocumentChunk,
    pub vector: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    dim: usize,
    chunks: Vec<StoredChunk>,
    documents: Vec<DocumentMetadata>,
}

pub struct MemoryVectorStore {
    embedder: Box<dyn Embedder>,
    chunks: Vec<StoredChunk>,
    documents: Vec<DocumentMetadata>,
}

impl MemoryVectorStore {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self { embedder, chunks: Vec::new(), documents: Vec::new() }
    }

    /// Loads a snapshot written by [`save`](Self::save). A missing file is an
    /// empty store.
    pub fn load(path: &Path, embedder: Box<dyn Embedder>) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no store snapshot yet, starting empty");
            return Ok(Self::new(embedder));
        }
        let reader = BufReader::new(fs::File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        if snapshot.dim != embedder.dim() {
            return Err(Error::InvalidInput(format!(
                "store at {} holds {}-dim vectors but the embedder produces {}",
                path.display(),
                snapshot.dim,
                embedder.dim()
            )));
        }
        info!(path = %path.display(), chunks = snapshot.chunks.len(), documents = snapshot.documents.len(), "loaded store");
        Ok(Self { embedder, chunks: snapshot.chunks, documents: snapshot.documents })
    }

    /// Writes the snapshot through a temp file in the target directory so a
    /// crash never leaves a half-written store behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let snapshot = Snapshot {
            dim: self.embedder.dim(),
            chunks: self.chunks.clone(),
            documents: self.documents.clone(),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        debug!(path = %path.display(), chunks = self.chunks.len(), "saved store");
        Ok(())
    }

    /// Embeds and stores one document, replacing any earlier copy with the
    /// same id. Returns the number of chunks stored.
    pub fn index_document(&mut self, doc: IngestedDocument) -> Result<usize> {
        let IngestedDocument { mut metadata, chunks } = doc;
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self
            .embedder
            .embed_batch(&texts)
            .map_err(|e| Error::Operation(format!("embedding {} failed: {e:#}", metadata.filename)))?;
        if vectors.len() != chunks.len() {
            return Err(Error::Operation(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.embedder.dim()) {
            return Err(Error::InvalidInput(format!(
                "embedding has {} dims, expected {}",
                bad.len(),
                self.embedder.dim()
            )));
        }

        // the earlier copy survives any embedding failure above
        let replaced = self.delete_document(&metadata.document_id);
        if replaced > 0 {
            debug!(document_id = %metadata.document_id, replaced, "replacing existing document");
        }
        let count = chunks.len();
        self.chunks.extend(chunks.into_iter().zip(vectors).map(|(chunk, vector)| StoredChunk { chunk, vector }));
        metadata.status = DocumentStatus::Indexed;
        metadata.chunk_count = count;
        info!(filename = %metadata.filename, document_id = %metadata.document_id, chunks = count, "indexed document");
        self.documents.push(metadata);
        Ok(count)
    }

    /// Removes every chunk of `document_id`; returns how many were removed.
    pub fn delete_document(&mut self, document_id: &str) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|c| c.chunk.document_id != document_id);
        self.documents.retain(|d| d.document_id != document_id);
        before - self.chunks.len()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.chunks.len();
        self.chunks.clear();
        self.documents.clear();
        removed
    }

    pub fn documents(&self) -> &[DocumentMetadata] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl VectorSearch for MemoryVectorStore {
    fn search(&self, query: &str, top_k: usize) -> anyhow::Result<Vec<Chunk>> {
        if self.chunks.is_empty() || top_k == 0 {
            return Ok(vec![]);
        }
        let q_vec = self
            .embedder
            .embed_batch(&[query.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector for the query"))?;
        let mut scored: Vec<(f32, &StoredChunk)> = self
            .chunks
            .iter()
            .map(|c| (cosine_similarity(&q_vec, &c.vector), c))
            .collect();
        // stable sort: equal similarities keep insertion order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored.into_iter().map(|(sim, c)| Chunk::from((&c.chunk, sim))).collect())
    }
}
