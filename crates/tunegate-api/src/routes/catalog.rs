//! Catalog lookup routes

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use tunegate_proxy::WatchPlaylistRequest;

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_SEARCH_LIMIT: u32 = 20;
const DEFAULT_PLAYLIST_LIMIT: u32 = 100;
const DEFAULT_WATCH_LIMIT: u32 = 25;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub filter: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct WatchParams {
    pub video_id: Option<String>,
    pub playlist_id: Option<String>,
    pub limit: Option<u32>,
    pub radio: Option<String>,
    pub shuffle: Option<String>,
}

impl WatchParams {
    fn into_request(self) -> Result<WatchPlaylistRequest, ApiError> {
        let video_id = self.video_id.filter(|v| !v.is_empty());
        let playlist_id = self.playlist_id.filter(|v| !v.is_empty());

        if video_id.is_none() && playlist_id.is_none() {
            return Err(ApiError::BadRequest(
                "video_id or playlist_id required".to_string(),
            ));
        }

        Ok(WatchPlaylistRequest {
            video_id,
            playlist_id,
            limit: self.limit.unwrap_or(DEFAULT_WATCH_LIMIT),
            radio: flag(self.radio.as_deref()),
            shuffle: flag(self.shuffle.as_deref()),
        })
    }
}

fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

// ==================== Search ====================

/// GET /api/search
async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    let results = state
        .catalog
        .search(&params.query, params.filter.as_deref(), limit)
        .await?;
    Ok(Json(results))
}

/// GET /api/search/suggestions
async fn search_suggestions(
    State(state): State<AppState>,
    params: Result<Query<SuggestionParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    Ok(Json(state.catalog.search_suggestions(&params.query).await?))
}

// ==================== Entities ====================

/// GET /api/song/{video_id}
async fn song(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.song(&video_id).await?))
}

/// GET /api/artist/{channel_id}
async fn artist(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.artist(&channel_id).await?))
}

/// GET /api/album/{browse_id}
async fn album(
    State(state): State<AppState>,
    Path(browse_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.album(&browse_id).await?))
}

/// GET /api/lyrics/{browse_id}
async fn lyrics(
    State(state): State<AppState>,
    Path(browse_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.lyrics(&browse_id).await?))
}

/// GET /api/related/{browse_id}
async fn related(
    State(state): State<AppState>,
    Path(browse_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.song_related(&browse_id).await?))
}

// ==================== Playlists ====================

/// GET /api/playlist/{playlist_id}
async fn playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_PLAYLIST_LIMIT);
    Ok(Json(state.catalog.playlist(&playlist_id, limit).await?))
}

/// GET /api/watch/playlist
async fn watch_playlist(
    State(state): State<AppState>,
    params: Result<Query<WatchParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let request = params.into_request()?;
    Ok(Json(state.catalog.watch_playlist(request).await?))
}

// ==================== Moods ====================

/// GET /api/moods
async fn mood_categories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.mood_categories().await?))
}

/// GET /api/moods/playlists/{params}
async fn mood_playlists(
    State(state): State<AppState>,
    Path(params): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.mood_playlists(&params).await?))
}

/// Create catalog routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/search/suggestions", get(search_suggestions))
        .route("/api/song/{video_id}", get(song))
        .route("/api/artist/{channel_id}", get(artist))
        .route("/api/playlist/{playlist_id}", get(playlist))
        .route("/api/album/{browse_id}", get(album))
        .route("/api/lyrics/{browse_id}", get(lyrics))
        .route("/api/watch/playlist", get(watch_playlist))
        .route("/api/related/{browse_id}", get(related))
        .route("/api/moods", get(mood_categories))
        .route("/api/moods/playlists/{params}", get(mood_playlists))
}
