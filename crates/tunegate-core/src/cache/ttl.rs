//! Bounded in-memory cache with per-entry expiry

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::key::CacheKey;
use super::manager::CacheClass;
use super::policy::{EvictionPolicy, Usage};
use crate::config::CacheClassConfig;

/// Counters for one cache class
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheStats {
    pub class: &'static str,
    pub entries: usize,
    pub max_entries: usize,
    pub ttl_secs: u64,
    pub eviction_policy: EvictionPolicy,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
    usage: Usage,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    /// Logical clock ordering insertions and accesses
    tick: u64,
}

impl<V> Inner<V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    fn victim(&self, policy: EvictionPolicy) -> Option<String> {
        policy
            .victim(self.entries.iter().map(|(key, entry)| (key, entry.usage)))
            .cloned()
    }
}

/// Memoization table for one operation class
///
/// Entries are never served past their expiry, and the table never holds
/// more than `max_entries` entries. Concurrent misses on the same key are
/// not coalesced; the last write wins.
pub struct TtlCache<V> {
    class: CacheClass,
    config: CacheClassConfig,
    inner: Mutex<Inner<V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(class: CacheClass, config: CacheClassConfig) -> Self {
        debug!(
            "Initializing {} cache (ttl: {}s, max_entries: {}, policy: {})",
            class.as_str(),
            config.ttl_secs,
            config.max_entries,
            config.eviction_policy
        );

        Self {
            class,
            config,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn class(&self) -> CacheClass {
        self.class
    }

    /// Look up a live entry
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let rendered = key.render();
        let now = Instant::now();

        let value = {
            let mut inner = self.inner.lock();
            let tick = inner.next_tick();

            match inner.entries.get(&rendered).map(|entry| entry.expires_at > now) {
                Some(true) => inner.entries.get_mut(&rendered).map(|entry| {
                    entry.usage.touch(tick);
                    entry.value.clone()
                }),
                Some(false) => {
                    debug!("Expired {} cache entry: {}", self.class.as_str(), rendered);
                    inner.entries.remove(&rendered);
                    None
                }
                None => None,
            }
        };

        match value {
            Some(value) => {
                self.record_hit();
                Some(value)
            }
            None => {
                self.record_miss();
                None
            }
        }
    }

    /// Store a value with a fresh expiry, evicting first if the class is full
    pub fn insert(&self, key: &CacheKey, value: V) {
        if self.config.max_entries == 0 {
            return;
        }

        let rendered = key.render();
        let now = Instant::now();
        let expires_at = expiry(now, self.config.ttl());

        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        if !inner.entries.contains_key(&rendered) && inner.entries.len() >= self.config.max_entries
        {
            inner.purge_expired(now);

            while inner.entries.len() >= self.config.max_entries {
                let Some(victim) = inner.victim(self.config.eviction_policy) else {
                    break;
                };
                debug!("Evicting {} cache entry: {}", self.class.as_str(), victim);
                inner.entries.remove(&victim);
            }
        }

        inner.entries.insert(
            rendered,
            Entry {
                value,
                expires_at,
                usage: Usage::new(tick),
            },
        );
    }

    /// Return the cached value for `key`, or run `operation` and cache its result
    ///
    /// A failed operation is returned to the caller and nothing is stored.
    pub async fn get_or_try_insert_with<E, F, Fut>(
        &self,
        key: CacheKey,
        operation: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            debug!("Cache hit ({}): {}", self.class.as_str(), key);
            return Ok(value);
        }

        debug!("Cache miss ({}): {}", self.class.as_str(), key);
        let value = operation().await?;
        self.insert(&key, value.clone());
        Ok(value)
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) -> usize {
        self.inner.lock().purge_expired(Instant::now())
    }

    /// Drop every entry
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let count = inner.entries.len();
        inner.entries.clear();
        count
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            hits as f64 / (hits + misses) as f64
        } else {
            0.0
        };

        CacheStats {
            class: self.class.as_str(),
            entries: self.len(),
            max_entries: self.config.max_entries,
            ttl_secs: self.config.ttl_secs,
            eviction_policy: self.config.eviction_policy,
            hits,
            misses,
            hit_rate,
        }
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("tunegate_cache_hits_total", "class" => self.class.as_str()).increment(1);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("tunegate_cache_misses_total", "class" => self.class.as_str())
            .increment(1);
    }
}

/// Upper bound on how far ahead an entry may expire
const MAX_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `now + ttl`, clamped so an oversized lifetime cannot overflow the clock
fn expiry(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl.min(MAX_LIFETIME)).unwrap_or(now)
}

/// Memoize `operation` in `cache` under `key`
pub async fn with_cache<V, E, F, Fut>(
    cache: &TtlCache<V>,
    key: CacheKey,
    operation: F,
) -> Result<V, E>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    cache.get_or_try_insert_with(key, operation).await
}
