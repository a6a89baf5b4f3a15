//! Tunegate - Music catalog and audio stream gateway

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LoggingConfig};
use tunegate_api::{AppState, create_router};
use tunegate_core::{
    BlockingPool, CacheManager, CatalogService, MirrorFleet, StreamService, spawn_cleanup_task,
};
use tunegate_proxy::{MirrorClient, MirrorClientConfig, RemoteCatalog, RemoteCatalogConfig};

/// Tunegate - Music catalog and audio stream gateway
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "TUNEGATE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "TUNEGATE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting Tunegate v{}", env!("CARGO_PKG_VERSION"));

    // Install the Prometheus recorder before any counter is touched
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    // Initialize cache manager
    let cache = Arc::new(CacheManager::new(&config.cache));

    // Initialize mirror fleet
    let mirror_client = Arc::new(MirrorClient::new(MirrorClientConfig {
        connect_timeout: config.mirrors.probe_timeout(),
        ..Default::default()
    })?);
    let fleet = Arc::new(MirrorFleet::from_config(&config.mirrors, mirror_client)?);
    info!("Mirror pool: {} instances", fleet.registry().len());

    let streams = Arc::new(StreamService::new(fleet, cache.clone()));

    // Initialize catalog provider
    let remote_catalog = Arc::new(RemoteCatalog::new(RemoteCatalogConfig {
        base_url: config.catalog.base_url.clone(),
        timeout: config.catalog.timeout(),
    }));
    let pool = BlockingPool::new(config.catalog.workers)?;
    let catalog = Arc::new(CatalogService::new(remote_catalog, pool, cache.clone()));

    // Start periodic purge of expired cache entries
    if config.cache.cleanup_interval_secs > 0 {
        spawn_cleanup_task(
            cache.clone(),
            Duration::from_secs(config.cache.cleanup_interval_secs),
        );
    }

    // Create application state
    let state = AppState::new(catalog, streams, cache);

    // Create router
    let app = create_router(state, Some(Arc::new(metrics_handle)))
        .layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);
    info!("Catalog: {}", config.catalog.base_url);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
