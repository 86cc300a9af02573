use std::sync::Arc;

use crate::config::Config;
use crate::extraction::RecordExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable extractor. Production: `GeminiExtractor`; tests use a canned one.
    pub extractor: Arc<dyn RecordExtractor>,
}
