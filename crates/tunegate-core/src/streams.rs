//! Cached stream resolution

use std::sync::Arc;

use crate::cache::{CacheKey, CacheManager, with_cache};
use crate::error::CoreError;
use crate::mirror::{Instance, MirrorFleet, ResolvedAudio, ResolvedStreams};

/// Stream operations exposed to the transport layer
pub struct StreamService {
    fleet: Arc<MirrorFleet>,
    cache: Arc<CacheManager>,
}

impl StreamService {
    pub fn new(fleet: Arc<MirrorFleet>, cache: Arc<CacheManager>) -> Self {
        Self { fleet, cache }
    }

    pub fn fleet(&self) -> &MirrorFleet {
        &self.fleet
    }

    /// Best audio stream for `video_id` (cache-aside)
    pub async fn audio(&self, video_id: &str) -> Result<ResolvedAudio, CoreError> {
        let key = CacheKey::new("audio").arg(video_id);
        with_cache(&self.cache.audio, key, || self.fleet.resolve_audio(video_id)).await
    }

    /// Every stream for `video_id` (cache-aside)
    pub async fn streams(&self, video_id: &str) -> Result<ResolvedStreams, CoreError> {
        let key = CacheKey::new("streams").arg(video_id);
        with_cache(&self.cache.streams, key, || self.fleet.resolve_streams(video_id)).await
    }

    /// Probe the fleet and pick a preferred instance; never cached
    pub async fn select_instance(&self) -> Instance {
        self.fleet.select_instance().await
    }
}
