use famdocs_answer::{metadata_table, Answer, ExtractiveSummarizer, SearchTool};
use famdocs_core::traits::{Summarizer, VectorSearch};
use famdocs_core::types::{Chunk, DocumentMetadata, DocumentStatus, RetrievalResult};
use famdocs_rank::Retriever;

struct FixedSearch(Vec<Chunk>);

impl VectorSearch for FixedSearch {
    fn search(&self, _query: &str, top_k: usize) -> anyhow::Result<Vec<Chunk>> {
        Ok(self.0.iter().take(top_k).cloned().collect())
    }
}

struct DownSearch;

impl VectorSearch for DownSearch {
    fn search(&self, _query: &str, _top_k: usize) -> anyhow::Result<Vec<Chunk>> {
        anyhow::bail!("index unavailable")
    }
}

struct BrokenSummarizer;

impl Summarizer for BrokenSummarizer {
    fn summarize(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("model timed out")
    }
}

fn corpus() -> Vec<Chunk> {
    vec![
        Chunk::new("d2", "Sem-2.pdf", "SGPA 8.12 Roll No 23123031006", 0.8),
        Chunk::new("d4", "Sem-4.pdf", "SGPA 9.31 Roll No 23123031006", 0.7),
    ]
}

fn tool() -> SearchTool<FixedSearch, ExtractiveSummarizer> {
    SearchTool::new(Retriever::new(FixedSearch(corpus())), ExtractiveSummarizer::default())
}

#[test]
fn run_renders_documents_confidence_and_summary() {
    let out = tool().run(r#"query="SGPA of Sem-2", top_k=5"#);
    assert!(out.starts_with("Found 1 relevant document(s):"), "{out}");
    assert!(out.contains("[Document 1] Sem-2.pdf"));
    assert!(out.contains("SGPA 8.12 Roll No 23123031006"));
    assert!(out.contains("Sem-2.pdf: 1.000"));
    assert!(out.contains("Summary:\nSem-2.pdf: SGPA 8.12 Roll No 23123031006"));
    assert!(!out.contains("Sem-4.pdf"));
}

#[test]
fn summary_mentions_every_contributing_document() {
    let answer = tool().answer("SGPA for all semesters", 5).unwrap();
    let summary = answer.summary.expect("summary");
    assert!(summary.contains("Sem-2.pdf"));
    assert!(summary.contains("Sem-4.pdf"));
}

#[test]
fn filtered_out_query_suggests_loosening_constraints() {
    let out = tool().run(r#"{"query": "SGPA less than 5 for Sem-2"}"#);
    assert!(out.starts_with("No documents satisfy the query constraints"), "{out}");
}

#[test]
fn empty_search_reports_no_documents() {
    let t = SearchTool::new(Retriever::new(FixedSearch(vec![])), ExtractiveSummarizer::default());
    assert_eq!(t.run("anything at all"), "No relevant documents found for your query.");
}

#[test]
fn synthesis_failure_still_returns_raw_context() {
    let t = SearchTool::new(Retriever::new(FixedSearch(corpus())), BrokenSummarizer);
    let answer = t.answer("SGPA of Sem-4", 5).unwrap();
    assert!(answer.summary.is_none());
    assert!(answer.synthesis_error.as_deref().unwrap_or_default().contains("model timed out"));
    assert_eq!(answer.result.documents().len(), 1);

    let rendered = answer.render();
    assert!(rendered.contains("SGPA 9.31"));
    assert!(rendered.contains("Summary unavailable"));
}

#[test]
fn search_failure_is_reported_as_error() {
    let t = SearchTool::new(Retriever::new(DownSearch), ExtractiveSummarizer::default());
    assert!(t.answer("SGPA", 5).unwrap_err().is_collaborator_failure());
    assert!(t.run("SGPA").starts_with("Error: Vector search failed"));
}

#[test]
fn bad_input_is_reported_as_error_text() {
    assert_eq!(tool().run("top_k=3"), "Error: Invalid input: query is required");
}

#[test]
fn closures_work_as_collaborators() {
    let search = |_q: &str, _k: usize| -> anyhow::Result<Vec<Chunk>> { Ok(corpus()) };
    let summarize = |_p: &str| -> anyhow::Result<String> { Ok("stub answer".to_string()) };
    let t = SearchTool::new(Retriever::new(search), summarize);
    let answer: Answer = t.answer("Sem-4 SGPA", 0).unwrap();
    assert_eq!(answer.summary.as_deref(), Some("stub answer"));
    assert!(matches!(answer.result, RetrievalResult::Documents { .. }));
}

#[test]
fn metadata_table_lists_documents() {
    let meta = DocumentMetadata {
        document_id: "abc".into(),
        filename: "Sem-2.pdf".into(),
        sender: "dad@example.com".into(),
        subject: "results".into(),
        received_at: chrono::Utc::now(),
        status: DocumentStatus::Indexed,
        chunk_count: 2,
    };
    let table = metadata_table(&[meta]);
    assert!(table.starts_with("Document Metadata:"));
    assert!(table.contains("| abc | Sem-2.pdf | dad@example.com | results |"));
    assert!(table.contains("| INDEXED | 2 |"));
}
