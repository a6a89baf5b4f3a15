//! Health check endpoints

use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health status response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Service banner served at the root
#[derive(Serialize)]
pub struct BannerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub version: String,
}

/// Health check handler
async fn health() -> Json<HealthResponse> {
    metrics::counter!("tunegate_liveness_checks_total").increment(1);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /
async fn home() -> Json<BannerResponse> {
    Json(BannerResponse {
        status: "ok".to_string(),
        message: "Music catalog API is running".to_string(),
        timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/healthz", get(health))
}
