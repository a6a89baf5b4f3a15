//! Cache manager owning one TTL cache per operation class

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::ttl::{CacheStats, TtlCache};
use crate::config::CacheSettings;
use crate::mirror::{ResolvedAudio, ResolvedStreams};

/// Logical operation classes, each with its own size bound and lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheClass {
    Streams,
    Search,
    Song,
    Artist,
    Playlist,
    Lyrics,
    Mood,
}

impl CacheClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheClass::Streams => "streams",
            CacheClass::Search => "search",
            CacheClass::Song => "song",
            CacheClass::Artist => "artist",
            CacheClass::Playlist => "playlist",
            CacheClass::Lyrics => "lyrics",
            CacheClass::Mood => "mood",
        }
    }
}

/// Every cache in the process
///
/// The two stream operations share the `streams` class configuration but keep
/// separate tables since they store different shapes.
pub struct CacheManager {
    pub audio: TtlCache<ResolvedAudio>,
    pub streams: TtlCache<ResolvedStreams>,
    pub search: TtlCache<Value>,
    pub song: TtlCache<Value>,
    pub artist: TtlCache<Value>,
    pub playlist: TtlCache<Value>,
    pub lyrics: TtlCache<Value>,
    pub mood: TtlCache<Value>,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(settings: &CacheSettings) -> Self {
        info!(
            "Initializing cache manager (streams: {}s, search: {}s, song: {}s, mood: {}s)",
            settings.streams.ttl_secs,
            settings.search.ttl_secs,
            settings.song.ttl_secs,
            settings.mood.ttl_secs
        );

        Self {
            audio: TtlCache::new(CacheClass::Streams, settings.streams),
            streams: TtlCache::new(CacheClass::Streams, settings.streams),
            search: TtlCache::new(CacheClass::Search, settings.search),
            song: TtlCache::new(CacheClass::Song, settings.song),
            artist: TtlCache::new(CacheClass::Artist, settings.artist),
            playlist: TtlCache::new(CacheClass::Playlist, settings.playlist),
            lyrics: TtlCache::new(CacheClass::Lyrics, settings.lyrics),
            mood: TtlCache::new(CacheClass::Mood, settings.mood),
        }
    }

    /// Per-table statistics
    pub fn stats(&self) -> Vec<CacheStats> {
        vec![
            self.audio.stats(),
            self.streams.stats(),
            self.search.stats(),
            self.song.stats(),
            self.artist.stats(),
            self.playlist.stats(),
            self.lyrics.stats(),
            self.mood.stats(),
        ]
    }

    /// Clear all cache entries
    pub fn clear(&self) -> usize {
        info!("Clearing all cache entries");

        let count = self.audio.clear()
            + self.streams.clear()
            + self.search.clear()
            + self.song.clear()
            + self.artist.clear()
            + self.playlist.clear()
            + self.lyrics.clear()
            + self.mood.clear();

        info!("Cleared {} cache entries", count);
        count
    }

    /// Drop expired entries from every table
    pub fn purge_expired(&self) -> usize {
        self.audio.purge_expired()
            + self.streams.purge_expired()
            + self.search.purge_expired()
            + self.song.purge_expired()
            + self.artist.purge_expired()
            + self.playlist.purge_expired()
            + self.lyrics.purge_expired()
            + self.mood.purge_expired()
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(&CacheSettings::default())
    }
}

/// Spawn a background task that drops expired entries periodically
///
/// Reads already refuse expired entries; this only returns memory early.
pub fn spawn_cleanup_task(
    cache: Arc<CacheManager>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    info!(
        "Starting background cache cleanup task (interval: {}s)",
        interval.as_secs()
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        // Skip the first tick (which fires immediately)
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                debug!("Scheduled cleanup removed {} expired entries", purged);
            }
        }
    })
}
