//! Deterministic feature-hashing embedder.
//!
//! Stands in for the external embedding model: every token is hashed into
//! one of `dim` buckets and the resulting vector is L2-normalized, so texts
//! sharing vocabulary land close together under cosine similarity.

use anyhow::{anyhow, Result};
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use famdocs_core::traits::Embedder;

pub const DEFAULT_DIM: usize = 256;
const MAX_TOKENS: usize = 8192;

pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(anyhow!("embedding dimension must be > 0"));
        }
        Ok(Self { dim })
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let lowered = text.to_lowercase();
        let tokens = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '.'))
            .map(|t| t.trim_matches('.'))
            .filter(|t| !t.is_empty())
            .take(MAX_TOKENS);
        for token in tokens {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            // top bit picks the sign so unrelated tokens tend to cancel out
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v { *x /= norm; }
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dim: DEFAULT_DIM }
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

/// Embedder selected by configuration.
pub fn get_default_embedder(dim: usize) -> Result<Box<dyn Embedder>> {
    tracing::debug!(dim, "using hash embedder");
    Ok(Box::new(HashEmbedder::new(dim)?))
}
