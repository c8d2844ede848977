use std::fmt::Write;

use famdocs_core::types::{DocumentContext, DocumentMetadata};

pub(crate) const QUESTION_MARKER: &str = "Question: ";
pub(crate) const DOCUMENT_MARKER: &str = "[Document ";
const RULE: &str = "---------------------------";

/// `[Document 1] Sem-2.pdf` followed by a rule and the context block, one
/// per document.
pub fn document_blocks(documents: &[DocumentContext]) -> String {
    let mut out = String::new();
    for (idx, doc) in documents.iter().enumerate() {
        let _ = writeln!(out, "{DOCUMENT_MARKER}{}] {}", idx + 1, doc.filename);
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "{}\n", doc.context);
    }
    out
}

pub(crate) fn parse_document_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(DOCUMENT_MARKER)?;
    let (_, filename) = rest.split_once("] ")?;
    Some(filename.trim())
}

pub(crate) fn is_rule(line: &str) -> bool {
    line.trim() == RULE
}

/// Prompt handed to the summarizer: the question plus every document block.
pub fn summary_prompt(query: &str, documents: &[DocumentContext]) -> String {
    format!(
        "Please summarize these findings in 2-3 sentences highlighting key points. \
         Mention every source filename.\n\n{QUESTION_MARKER}{query}\n\n{}",
        document_blocks(documents)
    )
}

/// `<filename>: <confidence>` per document.
pub fn confidence_lines(documents: &[DocumentContext]) -> String {
    documents
        .iter()
        .map(|d| format!("{}: {:.3}", d.filename, d.confidence))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn metadata_table(documents: &[DocumentMetadata]) -> String {
    if documents.is_empty() {
        return "No metadata found.".to_string();
    }
    let mut out = String::from("Document Metadata:\n");
    out.push_str("| Document ID | Filename | Sender | Subject | Received At | Status | Chunks |\n");
    out.push_str("|-------------|----------|--------|---------|-------------|--------|--------|\n");
    for d in documents {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            d.document_id,
            d.filename,
            d.sender,
            d.subject,
            d.received_at.to_rfc3339(),
            d.status,
            d.chunk_count
        );
    }
    out
}
