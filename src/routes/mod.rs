pub mod demo;
pub mod documents;
pub mod health;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Documents
        .route("/v1/documents", post(documents::generate_document))
        .route(
            "/v1/documents/export/:format",
            post(documents::export_document),
        )
        // Demo snapshots for shell development
        .route("/v1/demo/context", get(demo::demo_context))
        .route("/v1/demo/context/minimal", get(demo::minimal_context))
}
