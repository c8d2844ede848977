use crate::types::Chunk;

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Similarity search over previously ingested chunks.
///
/// May return fewer than `top_k` chunks, or none at all. An error means the
/// search itself failed (transport, storage), never "no match".
pub trait VectorSearch: Send + Sync {
    fn search(&self, query: &str, top_k: usize) -> anyhow::Result<Vec<Chunk>>;
}

/// Turns a fully assembled prompt into a natural-language answer.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, prompt: &str) -> anyhow::Result<String>;
}

impl<F> VectorSearch for F
where
    F: Fn(&str, usize) -> anyhow::Result<Vec<Chunk>> + Send + Sync,
{
    fn search(&self, query: &str, top_k: usize) -> anyhow::Result<Vec<Chunk>> {
        self(query, top_k)
    }
}

impl<F> Summarizer for F
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    fn summarize(&self, prompt: &str) -> anyhow::Result<String> {
        self(prompt)
    }
}
