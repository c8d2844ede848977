use tracing::{info, warn};

use famdocs_core::traits::{Summarizer, VectorSearch};
use famdocs_core::types::RetrievalResult;
use famdocs_core::{Error, Result};
use famdocs_rank::Retriever;

use crate::input::ToolInput;
use crate::render::{confidence_lines, document_blocks, summary_prompt};

/// Retrieval result plus the synthesized answer, if synthesis succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub query: String,
    pub result: RetrievalResult,
    pub summary: Option<String>,
    /// Set when the summarizer failed; the raw context is still usable.
    pub synthesis_error: Option<String>,
}

impl Answer {
    pub fn render(&self) -> String {
        match &self.result {
            RetrievalResult::NoCandidates => "No relevant documents found for your query.".to_string(),
            RetrievalResult::AllFiltered { candidates } => format!(
                "No documents satisfy the query constraints ({candidates} candidate chunk(s) were filtered out). \
                 Try loosening the semester/part or numeric conditions."
            ),
            RetrievalResult::Documents { documents } => {
                let mut out = format!("Found {} relevant document(s):\n\n", documents.len());
                out.push_str(&document_blocks(documents));
                out.push_str("Confidence:\n");
                out.push_str(&confidence_lines(documents));
                out.push_str("\n\n");
                match (&self.summary, &self.synthesis_error) {
                    (Some(summary), _) => {
                        out.push_str("Summary:\n");
                        out.push_str(summary);
                        out.push('\n');
                    }
                    (None, Some(err)) => {
                        out.push_str(&format!(
                            "Summary unavailable. {err}. The raw context is shown above.\n"
                        ));
                    }
                    (None, None) => {}
                }
                out
            }
        }
    }
}

/// The single entry point used by the agent layer: retrieve, then
/// synthesize an answer over the assembled per-document context.
pub struct SearchTool<S: VectorSearch, M: Summarizer> {
    retriever: Retriever<S>,
    summarizer: M,
}

impl<S: VectorSearch, M: Summarizer> SearchTool<S, M> {
    pub fn new(retriever: Retriever<S>, summarizer: M) -> Self {
        Self { retriever, summarizer }
    }

    pub fn retriever(&self) -> &Retriever<S> {
        &self.retriever
    }

    /// Search failures propagate; synthesis failures are recorded on the
    /// answer so the caller still gets the raw context.
    pub fn answer(&self, query: &str, top_k: usize) -> Result<Answer> {
        let result = self.retriever.retrieve(query, top_k)?;
        let mut answer = Answer { query: query.trim().to_string(), result, summary: None, synthesis_error: None };
        let documents = answer.result.documents();
        if documents.is_empty() {
            return Ok(answer);
        }
        let prompt = summary_prompt(&answer.query, documents);
        match self.summarizer.summarize(&prompt) {
            Ok(summary) => answer.summary = Some(summary),
            Err(e) => {
                let err = Error::Synthesis(format!("{e:#}"));
                warn!(error = %err, "returning raw context without a summary");
                answer.synthesis_error = Some(err.to_string());
            }
        }
        info!(documents = documents.len(), summarized = answer.summary.is_some(), "answered query");
        Ok(answer)
    }

    /// String-in, string-out form used by tool-calling agents. Errors are
    /// rendered as `Error: ...` text instead of being returned.
    pub fn run(&self, input: &str) -> String {
        let parsed = match ToolInput::parse(input) {
            Ok(p) => p,
            Err(e) => return format!("Error: {e}"),
        };
        match self.answer(&parsed.query, parsed.top_k) {
            Ok(answer) => answer.render(),
            Err(e) => format!("Error: {e}"),
        }
    }
}
