//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http::document::{apply_patches, export_document, load_document};
use crate::http::handlers::{activation, feedback, list_patterns, pattern_count, redo, show};
use crate::http::monitoring;
use crate::state::AppState;
use crate::websocket::ws_handler;

/// Create the router for one engine.
///
/// ## Route Structure
///
/// ```text
/// /patterns
///   GET    /patterns        - Pattern table metadata
///   GET    /patterns/count  - Current detection report
///   POST   /patterns/redo   - Start a pass over both tiers
///   POST   /patterns/show   - Scroll to and outline a flagged node
///
/// /document
///   GET    /document         - Export the live tree
///   PUT    /document         - Replace the live tree
///   POST   /document/patches - Apply incremental mutations
///
/// /activation - Activation toggle
/// /feedback   - User judgment on a flagged node
///
/// /metrics - Scan counters
/// /livez   - Liveness probe
///
/// /ws      - Detection reports pushed after every pass
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let pattern_routes = Router::new()
        .route("/", get(list_patterns))
        .route("/count", get(pattern_count))
        .route("/redo", post(redo))
        .route("/show", post(show))
        .with_state(state.clone());

    let document_routes = Router::new()
        .route("/", get(export_document))
        .route("/", put(load_document))
        .route("/patches", post(apply_patches))
        .with_state(state.clone());

    let host_routes = Router::new()
        .route("/activation", get(activation))
        .route("/feedback", post(feedback))
        .route("/metrics", get(monitoring::metrics))
        .with_state(state.clone());

    // Liveness probe has no state dependency
    let liveness_route = Router::new().route("/livez", get(monitoring::liveness_probe));

    let ws_route = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);

    Router::new()
        .nest("/patterns", pattern_routes)
        .nest("/document", document_routes)
        .merge(host_routes)
        .merge(liveness_route)
        .merge(ws_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
