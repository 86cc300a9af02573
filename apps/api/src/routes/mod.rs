pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;
use crate::upload::handlers;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/status", get(health::status_handler))
        .route(
            "/api/upload",
            post(handlers::handle_upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state);

    // Built web client; unknown paths fall back to index.html for client-side routing.
    match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => router,
    }
}
