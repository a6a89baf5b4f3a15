//! tunegate core business logic
//!
//! This crate provides the core functionality for tunegate: the TTL cache
//! layer, the bounded blocking pool for catalog calls, and the mirror fleet
//! (availability probing, instance selection, stream resolution).

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod mirror;
pub mod pool;
pub mod streams;

pub use cache::{
    CacheClass, CacheKey, CacheManager, CacheStats, EvictionPolicy, TtlCache, spawn_cleanup_task,
    with_cache,
};
pub use catalog::CatalogService;
pub use config::{CacheClassConfig, CacheSettings, MirrorConfig};
pub use error::CoreError;
pub use mirror::{Instance, MirrorFleet, MirrorRegistry, ResolvedAudio, ResolvedStreams};
pub use pool::BlockingPool;
pub use streams::StreamService;
