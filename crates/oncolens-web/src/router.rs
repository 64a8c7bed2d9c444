//! Axum router — maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    analyze::analyze,
    batch::ner_batch,
    system::{health, not_found, rules},
};
use crate::sse::sse_handler;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let permissive_cors = state.permissive_cors;
    let shared: SharedState = Arc::new(state);

    let router = Router::new()
        // Analysis API
        .route("/api/analyze",   post(analyze))
        .route("/api/ner/batch", post(ner_batch))

        // Introspection
        .route("/api/rules",     get(rules))
        .route("/api/health",    get(health))

        // SSE streaming
        .route("/api/events",    get(sse_handler))
        .fallback(not_found)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared);

    if permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
