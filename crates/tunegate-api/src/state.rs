//! Application state

use std::sync::Arc;
use tunegate_core::{CacheManager, CatalogService, StreamService};

/// Prometheus render handle served at `/metrics`
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub streams: Arc<StreamService>,
    pub cache: Arc<CacheManager>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogService>,
        streams: Arc<StreamService>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            catalog,
            streams,
            cache,
        }
    }
}
