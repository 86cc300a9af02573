use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "scoresheet-api"
    }))
}

/// GET /api/status
/// Liveness probe used by the web client before it offers the upload form.
pub async fn status_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Document upload API with Gemini integration is running"
    }))
}
