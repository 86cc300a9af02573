// Upload pipeline: multipart file in, scoresheet DOCX out.
// handlers.rs owns the HTTP edge; artifacts.rs owns the temp files.

pub mod artifacts;
pub mod handlers;

/// File name offered to the browser for the generated scoresheet.
pub const RESULT_FILE_NAME: &str = "processed-results.docx";

/// Multipart field carrying the uploaded document.
pub const DOCUMENT_FIELD: &str = "document";
