//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{services::cache::CacheStatsSnapshot, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
    /// Library API this instance talks to
    pub api_base_url: String,
    pub cache: CacheStatsSnapshot,
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_base_url: state.config.api.base_url.clone(),
        cache: state.api.cache().stats(),
    })
}
