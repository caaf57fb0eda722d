//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{bookmakers, evaluate, evaluate_batch, health, metrics, ready, scan, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        // Engine endpoints
        .route("/api/v1/bookmakers", get(bookmakers))
        .route("/api/v1/evaluate", post(evaluate))
        .route("/api/v1/evaluate/batch", post(evaluate_batch))
        .route("/api/v1/scan", post(scan))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
