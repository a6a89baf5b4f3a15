//! Cache management module

mod key;
mod manager;
mod policy;
mod ttl;

pub use key::CacheKey;
pub use manager::{CacheClass, CacheManager, spawn_cleanup_task};
pub use policy::EvictionPolicy;
pub use ttl::{CacheStats, TtlCache, with_cache};
