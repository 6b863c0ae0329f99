pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Headroom for multipart boundaries and part headers on top of the file cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analyze API
        .route("/api/analyze", post(handlers::handle_analyze))
        .route("/api/analyze/result", post(handlers::handle_analyze_result))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
