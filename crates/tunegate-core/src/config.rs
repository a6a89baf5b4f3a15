//! Shared configuration types
//!
//! The main config loading is done in the `tunegate` binary, but these types
//! define the mirror and cache configuration consumed by this crate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cache::{CacheClass, EvictionPolicy};

/// Mirror fleet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Mirror instance base URLs, in registration order
    #[serde(default = "default_instances")]
    pub instances: Vec<String>,
    /// Per-instance healthcheck timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Per-instance stream fetch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl MirrorConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            instances: default_instances(),
            probe_timeout_secs: default_timeout_secs(),
            fetch_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Size and lifetime of one cache class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheClassConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
    #[serde(default)]
    pub eviction_policy: EvictionPolicy,
}

impl CacheClassConfig {
    pub const fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            ttl_secs,
            max_entries,
            eviction_policy: EvictionPolicy::Lru,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Cache configuration for every class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Interval of the background purge of expired entries (0 disables it)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    #[serde(default = "default_streams")]
    pub streams: CacheClassConfig,
    #[serde(default = "default_search")]
    pub search: CacheClassConfig,
    #[serde(default = "default_song")]
    pub song: CacheClassConfig,
    #[serde(default = "default_artist")]
    pub artist: CacheClassConfig,
    #[serde(default = "default_playlist")]
    pub playlist: CacheClassConfig,
    #[serde(default = "default_lyrics")]
    pub lyrics: CacheClassConfig,
    #[serde(default = "default_mood")]
    pub mood: CacheClassConfig,
}

impl CacheSettings {
    /// Configuration for a given class
    pub fn for_class(&self, class: CacheClass) -> CacheClassConfig {
        match class {
            CacheClass::Streams => self.streams,
            CacheClass::Search => self.search,
            CacheClass::Song => self.song,
            CacheClass::Artist => self.artist,
            CacheClass::Playlist => self.playlist,
            CacheClass::Lyrics => self.lyrics,
            CacheClass::Mood => self.mood,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: default_cleanup_interval_secs(),
            streams: default_streams(),
            search: default_search(),
            song: default_song(),
            artist: default_artist(),
            playlist: default_playlist(),
            lyrics: default_lyrics(),
            mood: default_mood(),
        }
    }
}

// Default value functions
fn default_instances() -> Vec<String> {
    [
        "https://pipedapi.nosebs.ru",
        "https://piped-api.privacy.com.de",
        "https://pipedapi.adminforge.de",
        "https://api.piped.yt",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

fn default_streams() -> CacheClassConfig {
    CacheClassConfig::new(300, 100) // 5 minutes
}

fn default_search() -> CacheClassConfig {
    CacheClassConfig::new(1800, 100) // 30 minutes
}

fn default_song() -> CacheClassConfig {
    CacheClassConfig::new(3600, 100) // 1 hour
}

fn default_artist() -> CacheClassConfig {
    CacheClassConfig::new(3600, 100)
}

fn default_playlist() -> CacheClassConfig {
    CacheClassConfig::new(1800, 50)
}

fn default_lyrics() -> CacheClassConfig {
    CacheClassConfig::new(7200, 50) // 2 hours
}

fn default_mood() -> CacheClassConfig {
    CacheClassConfig::new(86400, 20) // 24 hours
}
