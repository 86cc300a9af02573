use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use chrono::Utc;
use tokio::task::JoinError;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::document::DOCX_MIME;
use crate::errors::AppError;
use crate::extraction::{DocumentKind, UploadedDocument};
use crate::state::AppState;
use crate::upload::artifacts::ScratchFiles;
use crate::upload::{DOCUMENT_FIELD, RESULT_FILE_NAME};

/// The `document` part of an upload form.
struct DocumentPart {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

/// POST /api/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4();
    process_upload(state, multipart)
        .instrument(info_span!("upload", %request_id))
        .await
}

async fn process_upload(state: AppState, mut multipart: Multipart) -> Result<Response, AppError> {
    let part = read_document_part(&mut multipart)
        .await?
        .ok_or(AppError::NoFile)?;

    let kind = DocumentKind::detect(part.content_type.as_deref(), part.file_name.as_deref())
        .ok_or_else(|| AppError::UnsupportedFileType(part.content_type.clone().unwrap_or_default()))?;
    let file_name = part.file_name.unwrap_or_else(|| "upload".to_string());
    info!(
        "Received {} ({:?}, {} bytes)",
        file_name,
        kind,
        part.bytes.len()
    );

    let bytes = part.bytes;
    let scratch = tokio::task::spawn_blocking(move || ScratchFiles::create(kind, &bytes))
        .await
        .map_err(join_failed)?
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("failed to store upload")))?;

    let document = UploadedDocument {
        kind,
        file_name,
        path: scratch.input_path().to_path_buf(),
    };
    let records = state.extractor.extract(&document).await?;

    let created = Utc::now();
    let docx = tokio::task::spawn_blocking(move || {
        let mut scratch = scratch;
        scratch.render(&records, created)
    })
    .await
    .map_err(join_failed)??;

    info!("Returning {} ({} bytes)", RESULT_FILE_NAME, docx.len());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{RESULT_FILE_NAME}\""),
            ),
        ],
        docx,
    )
        .into_response())
}

/// Returns the first `document` part, skipping any other fields.
async fn read_document_part(multipart: &mut Multipart) -> Result<Option<DocumentPart>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_failed)? {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_failed)?;
        return Ok(Some(DocumentPart {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

fn multipart_failed(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn join_failed(e: JoinError) -> AppError {
    AppError::Internal(anyhow::anyhow!("blocking task failed in upload: {e}"))
}
