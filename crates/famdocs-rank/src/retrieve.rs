use tracing::{debug, info};

use famdocs_core::config::RetrievalSettings;
use famdocs_core::traits::VectorSearch;
use famdocs_core::types::{Chunk, DocumentContext, RetrievalResult};
use famdocs_core::{Error, Result};

use crate::constraints::QueryConstraints;
use crate::group::{group, normalize};
use crate::{filter, score};

pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    pub default_top_k: usize,
    pub context_separator: String,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self { default_top_k: DEFAULT_TOP_K, context_separator: "\n".to_string() }
    }
}

impl From<&RetrievalSettings> for RetrievalOptions {
    fn from(s: &RetrievalSettings) -> Self {
        Self {
            default_top_k: if s.default_top_k == 0 { DEFAULT_TOP_K } else { s.default_top_k },
            context_separator: s.context_separator.clone(),
        }
    }
}

/// Vector search followed by constraint filtering, lexical re-scoring,
/// grouping by document and confidence normalisation.
///
/// Holds no per-query state; one instance can serve concurrent queries.
pub struct Retriever<S: VectorSearch> {
    search: S,
    options: RetrievalOptions,
}

impl<S: VectorSearch> Retriever<S> {
    pub fn new(search: S) -> Self {
        Self::with_options(search, RetrievalOptions::default())
    }

    pub fn with_options(search: S, options: RetrievalOptions) -> Self {
        Self { search, options }
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    pub fn options(&self) -> &RetrievalOptions {
        &self.options
    }

    /// `0` selects the configured default.
    pub fn effective_top_k(&self, top_k: usize) -> usize {
        if top_k == 0 { self.options.default_top_k } else { top_k }
    }

    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievalResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }
        let top_k = self.effective_top_k(top_k);
        let raw_chunks = self
            .search
            .search(query, top_k)
            .map_err(|e| Error::Search(format!("{e:#}")))?;
        debug!(top_k, returned = raw_chunks.len(), "vector search complete");
        self.rank(query, raw_chunks)
    }

    /// The pure half of [`retrieve`](Self::retrieve): ranks an already
    /// retrieved candidate set against `query`.
    pub fn rank(&self, query: &str, raw_chunks: Vec<Chunk>) -> Result<RetrievalResult> {
        let candidates: Vec<Chunk> = raw_chunks.into_iter().filter(|c| !c.text.trim().is_empty()).collect();
        if candidates.is_empty() {
            info!("no candidates returned for query");
            return Ok(RetrievalResult::NoCandidates);
        }
        let candidate_count = candidates.len();

        let constraints = QueryConstraints::from_query(query);
        debug!(
            inequality = ?constraints.inequality,
            selectors = ?constraints.selectors,
            "extracted query constraints"
        );

        let mut survivors = filter::apply(candidates, &constraints);
        if survivors.is_empty() {
            info!(candidates = candidate_count, "all candidates filtered out by query constraints");
            return Ok(RetrievalResult::AllFiltered { candidates: candidate_count });
        }
        for chunk in &mut survivors {
            chunk.relevance_score = score::score(query, &chunk.text);
        }

        let groups = group(&survivors);
        let confidences = normalize(&groups)?;
        let documents: Vec<DocumentContext> = groups
            .iter()
            .zip(confidences)
            .map(|(g, (filename, confidence))| DocumentContext {
                filename,
                context: g.context(&self.options.context_separator),
                confidence,
                score: g.score,
                chunk_count: g.texts.len(),
            })
            .collect();
        info!(
            candidates = candidate_count,
            kept = survivors.len(),
            documents = documents.len(),
            "retrieval complete"
        );
        Ok(RetrievalResult::Documents { documents })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_search(_q: &str, _k: usize) -> anyhow::Result<Vec<Chunk>> {
        Ok(vec![])
    }

    #[test]
    fn zero_top_k_uses_default() {
        let r = Retriever::new(no_search);
        assert_eq!(r.effective_top_k(0), DEFAULT_TOP_K);
        assert_eq!(r.effective_top_k(12), 12);
    }

    #[test]
    fn options_from_settings() {
        let settings = RetrievalSettings { default_top_k: 9, context_separator: "\n---\n".into() };
        let opts = RetrievalOptions::from(&settings);
        assert_eq!(opts.default_top_k, 9);
        assert_eq!(opts.context_separator, "\n---\n");
    }

    #[test]
    fn blank_chunks_are_not_candidates() {
        let r = Retriever::new(no_search);
        let out = r.rank("SGPA", vec![Chunk::new("d", "Sem-1.pdf", "   ", 0.5)]).unwrap();
        assert_eq!(out, RetrievalResult::NoCandidates);
    }
}
