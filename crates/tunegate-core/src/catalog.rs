//! Catalog service
//!
//! Every catalog lookup is memoized in its class cache and, on a miss, runs
//! on the bounded blocking pool.

use serde_json::Value;
use std::sync::Arc;
use tunegate_proxy::{CatalogClient, CatalogError, WatchPlaylistRequest};

use crate::cache::{CacheKey, CacheManager, TtlCache, with_cache};
use crate::error::CoreError;
use crate::pool::BlockingPool;

pub struct CatalogService {
    client: Arc<dyn CatalogClient>,
    pool: BlockingPool,
    cache: Arc<CacheManager>,
}

impl CatalogService {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        pool: BlockingPool,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            client,
            pool,
            cache,
        }
    }

    async fn call<F>(
        &self,
        cache: &TtlCache<Value>,
        key: CacheKey,
        lookup: F,
    ) -> Result<Value, CoreError>
    where
        F: FnOnce(&dyn CatalogClient) -> Result<Value, CatalogError> + Send + 'static,
    {
        let client = self.client.clone();
        with_cache(cache, key, || self.pool.run(move || lookup(client.as_ref()))).await
    }

    // ==================== Search ====================

    pub async fn search(
        &self,
        query: &str,
        filter: Option<&str>,
        limit: u32,
    ) -> Result<Value, CoreError> {
        let key = CacheKey::new("search")
            .arg(query)
            .kwarg("filter", filter)
            .kwarg("limit", limit);
        let query = query.to_string();
        let filter = filter.map(str::to_string);

        self.call(&self.cache.search, key, move |c| {
            c.search(&query, filter.as_deref(), limit)
        })
        .await
    }

    pub async fn search_suggestions(&self, query: &str) -> Result<Value, CoreError> {
        let key = CacheKey::new("search_suggestions").arg(query);
        let query = query.to_string();

        self.call(&self.cache.search, key, move |c| c.search_suggestions(&query))
            .await
    }

    // ==================== Entities ====================

    pub async fn song(&self, video_id: &str) -> Result<Value, CoreError> {
        let key = CacheKey::new("song").arg(video_id);
        let id = video_id.to_string();
        self.call(&self.cache.song, key, move |c| c.song(&id)).await
    }

    pub async fn artist(&self, channel_id: &str) -> Result<Value, CoreError> {
        let key = CacheKey::new("artist").arg(channel_id);
        let id = channel_id.to_string();
        self.call(&self.cache.artist, key, move |c| c.artist(&id)).await
    }

    pub async fn album(&self, browse_id: &str) -> Result<Value, CoreError> {
        let key = CacheKey::new("album").arg(browse_id);
        let id = browse_id.to_string();
        self.call(&self.cache.song, key, move |c| c.album(&id)).await
    }

    pub async fn song_related(&self, browse_id: &str) -> Result<Value, CoreError> {
        let key = CacheKey::new("song_related").arg(browse_id);
        let id = browse_id.to_string();
        self.call(&self.cache.song, key, move |c| c.song_related(&id)).await
    }

    pub async fn lyrics(&self, browse_id: &str) -> Result<Value, CoreError> {
        let key = CacheKey::new("lyrics").arg(browse_id);
        let id = browse_id.to_string();
        self.call(&self.cache.lyrics, key, move |c| c.lyrics(&id)).await
    }

    // ==================== Playlists ====================

    pub async fn playlist(&self, playlist_id: &str, limit: u32) -> Result<Value, CoreError> {
        let key = CacheKey::new("playlist").arg(playlist_id).kwarg("limit", limit);
        let id = playlist_id.to_string();
        self.call(&self.cache.playlist, key, move |c| c.playlist(&id, limit))
            .await
    }

    pub async fn watch_playlist(&self, request: WatchPlaylistRequest) -> Result<Value, CoreError> {
        let key = CacheKey::new("watch_playlist")
            .kwarg("videoId", &request.video_id)
            .kwarg("playlistId", &request.playlist_id)
            .kwarg("limit", request.limit)
            .kwarg("radio", request.radio)
            .kwarg("shuffle", request.shuffle);

        self.call(&self.cache.playlist, key, move |c| c.watch_playlist(&request))
            .await
    }

    // ==================== Moods ====================

    pub async fn mood_categories(&self) -> Result<Value, CoreError> {
        let key = CacheKey::new("mood_categories");
        self.call(&self.cache.mood, key, |c| c.mood_categories()).await
    }

    pub async fn mood_playlists(&self, params: &str) -> Result<Value, CoreError> {
        let key = CacheKey::new("mood_playlists").arg(params);
        let params = params.to_string();
        self.call(&self.cache.mood, key, move |c| c.mood_playlists(&params))
            .await
    }
}
