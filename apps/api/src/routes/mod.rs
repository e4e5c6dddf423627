pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::scoring::handlers;
use crate::state::AppState;

/// Résumé uploads larger than this are rejected before parsing.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Multipart upload with a PDF résumé
        .route("/score", post(handlers::handle_score_upload))
        // JSON body with pre-extracted résumé text
        .route("/api/v1/score", post(handlers::handle_score_json))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
