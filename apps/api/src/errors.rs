use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::document::DocxError;
use crate::extraction::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] DocxError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NoFile => (
                StatusCode::BAD_REQUEST,
                "NO_FILE",
                "No file uploaded".to_string(),
            ),
            AppError::UnsupportedFileType(mime) => {
                tracing::warn!("Rejected upload with content type {mime:?}");
                (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_FILE_TYPE",
                    "Only DOCX and PDF files are allowed".to_string(),
                )
            }
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "FILE_TOO_LARGE",
                "The uploaded file is too large".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extraction(e) => extraction_response(e),
            AppError::Serialization(e) => {
                tracing::error!("DOCX serialization error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERIALIZATION_ERROR",
                    "Failed to build the result document".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn extraction_response(e: &ExtractionError) -> (StatusCode, &'static str, String) {
    match e {
        ExtractionError::Llm(inner) => {
            tracing::error!("LLM error: {inner}");
            (
                StatusCode::BAD_GATEWAY,
                "EXTRACTION_ERROR",
                "Failed to process the document with Gemini".to_string(),
            )
        }
        ExtractionError::Io(_) | ExtractionError::Task(_) => {
            tracing::error!("Extraction failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
            )
        }
        ExtractionError::Unreadable(_)
        | ExtractionError::EmptyDocument
        | ExtractionError::NoJson
        | ExtractionError::Parse(_) => {
            tracing::warn!("Unusable document: {e}");
            (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE_DOCUMENT", e.to_string())
        }
    }
}
