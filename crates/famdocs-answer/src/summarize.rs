use std::collections::HashSet;

use famdocs_core::traits::Summarizer;
use famdocs_rank::tokenize;

use crate::render::{is_rule, parse_document_header, QUESTION_MARKER};

/// Offline summarizer: quotes, per source document, the lines that share
/// vocabulary with the question. Every document in the prompt is named in
/// the answer, with its first line when nothing matches.
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    max_lines_per_document: usize,
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self { max_lines_per_document: 3 }
    }
}

impl ExtractiveSummarizer {
    pub fn new(max_lines_per_document: usize) -> Self {
        Self { max_lines_per_document: max_lines_per_document.max(1) }
    }
}

struct Section {
    filename: String,
    matched: Vec<String>,
    first_line: Option<String>,
}

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, prompt: &str) -> anyhow::Result<String> {
        let question = prompt.lines().find_map(|l| l.strip_prefix(QUESTION_MARKER)).unwrap_or("");
        let q_tokens: HashSet<String> = tokenize(question).into_iter().collect();

        let mut sections: Vec<Section> = Vec::new();
        let mut lines = prompt.lines().peekable();
        while let Some(line) = lines.next() {
            // a header is only real when the rule follows it directly
            if let Some(filename) = parse_document_header(line).filter(|_| lines.peek().is_some_and(|l| is_rule(l))) {
                sections.push(Section { filename: filename.to_string(), matched: Vec::new(), first_line: None });
                lines.next();
                continue;
            }
            let Some(section) = sections.last_mut() else { continue };
            let text = line.trim();
            if text.is_empty() || is_rule(text) {
                continue;
            }
            if section.first_line.is_none() {
                section.first_line = Some(text.to_string());
            }
            if section.matched.len() < self.max_lines_per_document
                && tokenize(text).iter().any(|t| q_tokens.contains(t))
            {
                section.matched.push(text.to_string());
            }
        }

        if sections.is_empty() {
            anyhow::bail!("prompt contains no documents to summarize");
        }
        let lines: Vec<String> = sections
            .into_iter()
            .map(|s| {
                let body = if s.matched.is_empty() { s.first_line.unwrap_or_default() } else { s.matched.join(" / ") };
                format!("{}: {}", s.filename, body)
            })
            .collect();
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::summary_prompt;
    use famdocs_core::types::DocumentContext;

    fn doc(filename: &str, context: &str) -> DocumentContext {
        DocumentContext { filename: filename.into(), context: context.into(), confidence: 1.0, score: 1.0, chunk_count: 1 }
    }

    #[test]
    fn quotes_matching_lines_and_names_every_document() {
        let prompt = summary_prompt(
            "SGPA of Sem-1 and Sem-4",
            &[doc("Sem-1.pdf", "Name: A. Student\nSGPA 7.45"), doc("Sem-4.pdf", "Attendance 92%")],
        );
        let summary = ExtractiveSummarizer::default().summarize(&prompt).unwrap();
        assert_eq!(summary, "Sem-1.pdf: SGPA 7.45\nSem-4.pdf: Attendance 92%");
    }

    #[test]
    fn caps_lines_per_document() {
        let prompt = summary_prompt("sgpa", &[doc("a.pdf", "sgpa 1\nsgpa 2\nsgpa 3")]);
        let summary = ExtractiveSummarizer::new(2).summarize(&prompt).unwrap();
        assert_eq!(summary, "a.pdf: sgpa 1 / sgpa 2");
    }

    #[test]
    fn header_lookalike_in_document_text_stays_in_its_section() {
        let prompt = summary_prompt("sgpa", &[doc("Sem-1.pdf", "[Document 9] fake.pdf\nsgpa 7.45")]);
        let summary = ExtractiveSummarizer::default().summarize(&prompt).unwrap();
        assert_eq!(summary, "Sem-1.pdf: sgpa 7.45");
    }

    #[test]
    fn prompt_without_documents_fails() {
        assert!(ExtractiveSummarizer::default().summarize("Question: hello").is_err());
    }
}
