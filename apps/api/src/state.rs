use std::sync::Arc;

use crate::jobs::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The same pipeline the `job-search` CLI drives.
    pub pipeline: Arc<Pipeline>,
}
