use std::sync::Arc;

use crate::scoring::pipeline::ScoringPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; immutable weights, skill set and client handles.
    pub pipeline: Arc<ScoringPipeline>,
}
