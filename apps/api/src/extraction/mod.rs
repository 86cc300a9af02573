//! Record extraction: uploaded document → plain text → model → `Vec<Record>`.
//!
//! The HTTP layer only sees the [`RecordExtractor`] trait, so tests can swap in
//! a canned extractor without a network call.

pub mod prompts;
pub mod text;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::extraction::prompts::{extraction_prompt, RECORD_EXTRACTION_SYSTEM};
use crate::extraction::text::to_plain_text;
use crate::llm_client::{extract_json_array, strip_json_fences, LlmClient, LlmError};
use crate::models::record::Record;

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document could not be read: {0}")]
    Unreadable(String),

    #[error("document contains no text")]
    EmptyDocument,

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("could not find a JSON array in the model response")]
    NoJson,

    #[error("model response is not a valid record list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("text conversion task failed: {0}")]
    Task(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Document kinds
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Docx,
    Pdf,
}

impl DocumentKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            crate::document::DOCX_MIME => Some(Self::Docx),
            PDF_MIME => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Decides the kind from the declared content type. Browsers and curl send
    /// `application/octet-stream` (or nothing) for unknown files; only then does
    /// the file extension decide.
    pub fn detect(mime: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        match mime {
            Some(m) if !is_generic_mime(m) => Self::from_mime(m),
            _ => file_name.and_then(Self::from_file_name),
        }
    }
}

fn is_generic_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    essence.is_empty() || essence.eq_ignore_ascii_case("application/octet-stream")
}

/// An upload saved to local scratch storage.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub kind: DocumentKind,
    pub file_name: String,
    pub path: PathBuf,
}

// ────────────────────────────────────────────────────────────────────────────
// Extractor
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait RecordExtractor: Send + Sync {
    async fn extract(&self, document: &UploadedDocument) -> Result<Vec<Record>, ExtractionError>;
}

/// Extracts records by asking Gemini to read the document text.
pub struct GeminiExtractor {
    llm: LlmClient,
}

impl GeminiExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl RecordExtractor for GeminiExtractor {
    async fn extract(&self, document: &UploadedDocument) -> Result<Vec<Record>, ExtractionError> {
        let kind = document.kind;
        let path = document.path.clone();

        // File read and ZIP/PDF decoding are blocking and CPU-bound.
        let text = tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(&path)?;
            to_plain_text(kind, &bytes)
        })
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))??;

        debug!(
            "Converted {} ({:?}) to {} chars of text",
            document.file_name,
            kind,
            text.len()
        );

        info!("Sending extraction prompt to {}", self.llm.model());
        let answer = self
            .llm
            .call_text(&extraction_prompt(&text), RECORD_EXTRACTION_SYSTEM)
            .await?;
        debug!("Raw model response:\n{answer}");

        let records = parse_records(&answer)?;
        info!("Extracted {} record(s) from {}", records.len(), document.file_name);
        Ok(records)
    }
}

/// Parses the model's answer into records, dropping rows with no content.
pub fn parse_records(answer: &str) -> Result<Vec<Record>, ExtractionError> {
    let json = extract_json_array(strip_json_fences(answer)).ok_or(ExtractionError::NoJson)?;
    let mut records: Vec<Record> = serde_json::from_str(json)?;
    records.retain(|r| !r.is_blank());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    // ── DocumentKind ─────────────────────────────────────────────────────────

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(
            DocumentKind::from_mime(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::from_mime("application/pdf; charset=binary"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::from_mime("text/plain"), None);
        assert_eq!(DocumentKind::from_mime("application/msword"), None);
    }

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(
            DocumentKind::from_file_name("Results.DOCX"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::from_file_name("scan.final.pdf"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::from_file_name("notes.txt"), None);
        assert_eq!(DocumentKind::from_file_name("no_extension"), None);
    }

    #[test]
    fn test_detect_prefers_specific_mime() {
        // A declared non-generic type wins even when the name disagrees.
        assert_eq!(
            DocumentKind::detect(Some("text/plain"), Some("scores.docx")),
            None
        );
        assert_eq!(
            DocumentKind::detect(Some("application/octet-stream"), Some("scores.docx")),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::detect(None, Some("scores.pdf")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::detect(None, None), None);
    }

    // ── parse_records ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_records_from_fenced_answer() {
        let answer = "```json\n[{\"sn\": 1, \"regNo\": \"AB01\", \"ca\": 20, \"exam\": 50, \"total\": 70}]\n```";
        let records = parse_records(answer).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sn, NonZeroU32::new(1));
        assert_eq!(records[0].cells(0), ["1", "AB01", "20", "50", "70"]);
    }

    #[test]
    fn test_parse_records_from_prose_answer() {
        let answer = "Sure! Here is the data:\n[{\"regNo\": \"AB02\"}, {\"regNo\": \"AB03\"}]\nThanks.";
        let records = parse_records(answer).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_records_drops_blank_rows() {
        let answer = r#"[{"regNo": "AB01"}, {}, {"sn": null, "regNo": ""}, {"total": 12}]"#;
        let records = parse_records(answer).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_records_without_array_fails() {
        assert!(matches!(
            parse_records("I could not find any table."),
            Err(ExtractionError::NoJson)
        ));
    }

    #[test]
    fn test_parse_records_with_broken_json_fails() {
        assert!(matches!(
            parse_records("[{\"regNo\": \"AB01\",]"),
            Err(ExtractionError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn test_prompt_embeds_document_text() {
        let prompt = extraction_prompt("  S/N REG NO CA\n1 AB01 20  ");
        assert!(prompt.contains("----\nS/N REG NO CA\n1 AB01 20\n----"));
        assert!(prompt.contains("sn, regNo, ca, exam, and total"));
    }
}
