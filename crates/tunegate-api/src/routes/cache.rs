//! Cache management routes

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get},
};
use serde::Serialize;
use tracing::info;
use tunegate_core::CacheStats;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub total_entries: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
    pub caches: Vec<CacheStats>,
}

/// GET /api/v1/cache/stats
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let caches = state.cache.stats();

    let total_entries = caches.iter().map(|c| c.entries).sum();
    let hit_count: u64 = caches.iter().map(|c| c.hits).sum();
    let miss_count: u64 = caches.iter().map(|c| c.misses).sum();
    let hit_rate = if hit_count + miss_count > 0 {
        hit_count as f64 / (hit_count + miss_count) as f64
    } else {
        0.0
    };

    Json(CacheStatsResponse {
        total_entries,
        hit_count,
        miss_count,
        hit_rate,
        caches,
    })
}

/// DELETE /api/v1/cache
async fn clear_cache(State(state): State<AppState>) -> Json<serde_json::Value> {
    info!("Clearing cache");

    let count = state.cache.clear();

    Json(serde_json::json!({
        "cleared": count
    }))
}

/// Create cache routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/cache/stats", get(cache_stats))
        .route("/api/v1/cache", delete(clear_cache))
}
