use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub generator: String,
    pub demo_mode: bool,
}

/// Health check endpoint
///
/// The provider is not contacted; a generation call is the only real check.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generator: state.pipeline.generator_name().to_string(),
        demo_mode: state.settings.demo_mode,
    })
}
