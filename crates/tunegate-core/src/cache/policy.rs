//! Cache eviction policies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which entry a full cache class gives up to make room
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Least Recently Used - evict the entry read or written longest ago
    #[default]
    Lru,
    /// Least Frequently Used - evict the entry with the fewest hits
    Lfu,
    /// First In First Out - evict the oldest insertion
    Fifo,
}

/// Bookkeeping an entry carries for eviction, in logical clock ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Usage {
    pub inserted: u64,
    pub last_access: u64,
    pub hits: u64,
}

impl Usage {
    pub fn new(tick: u64) -> Self {
        Self {
            inserted: tick,
            last_access: tick,
            hits: 0,
        }
    }

    pub fn touch(&mut self, tick: u64) {
        self.last_access = tick;
        self.hits += 1;
    }
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Lfu => "lfu",
            EvictionPolicy::Fifo => "fifo",
        }
    }

    /// Pick the key this policy evicts first
    ///
    /// LFU breaks ties on recency.
    pub(crate) fn victim<'a, K, I>(self, candidates: I) -> Option<&'a K>
    where
        I: IntoIterator<Item = (&'a K, Usage)>,
        K: 'a,
    {
        let candidates = candidates.into_iter();
        let chosen = match self {
            EvictionPolicy::Lru => candidates.min_by_key(|(_, u)| u.last_access),
            EvictionPolicy::Lfu => candidates.min_by_key(|(_, u)| (u.hits, u.last_access)),
            EvictionPolicy::Fifo => candidates.min_by_key(|(_, u)| u.inserted),
        };
        chosen.map(|(key, _)| key)
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(inserted: u64, last_access: u64, hits: u64) -> Usage {
        Usage {
            inserted,
            last_access,
            hits,
        }
    }

    #[test]
    fn test_victim_per_policy() {
        let entries = [
            ("old-but-hot", usage(1, 9, 5)),
            ("stale", usage(2, 3, 2)),
            ("cold", usage(4, 6, 0)),
        ];
        let candidates = || entries.iter().map(|(k, u)| (k, *u));

        assert_eq!(EvictionPolicy::Lru.victim(candidates()), Some(&"stale"));
        assert_eq!(EvictionPolicy::Lfu.victim(candidates()), Some(&"cold"));
        assert_eq!(EvictionPolicy::Fifo.victim(candidates()), Some(&"old-but-hot"));
    }

    #[test]
    fn test_empty_has_no_victim() {
        let none: Vec<(&String, Usage)> = Vec::new();
        assert_eq!(EvictionPolicy::Lru.victim(none), None);
    }

    #[test]
    fn test_touch_counts_hits() {
        let mut u = Usage::new(1);
        u.touch(5);
        u.touch(7);
        assert_eq!(u, usage(1, 7, 2));
    }

    #[test]
    fn test_config_spelling() {
        let policy: EvictionPolicy = serde_json::from_str("\"lfu\"").unwrap();
        assert_eq!(policy, EvictionPolicy::Lfu);
        assert_eq!(policy.to_string(), "lfu");
        assert!(serde_json::from_str::<EvictionPolicy>("\"random\"").is_err());
    }
}
