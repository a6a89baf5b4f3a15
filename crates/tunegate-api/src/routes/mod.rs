//! API routes

mod cache;
mod catalog;
mod health;
pub mod metrics;
mod streams;

use axum::Router;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::{AppState, MetricsHandle};

/// Fallback for unmatched routes
async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        // Banner and liveness
        .merge(health::routes())
        // Catalog lookups
        .merge(catalog::routes())
        // Stream resolution and instance selection
        .merge(streams::routes())
        // Cache management
        .merge(cache::routes())
        .with_state(state);

    // Add metrics endpoint if handle is provided
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router.fallback(not_found)
}
