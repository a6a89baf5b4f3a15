//! Stream resolution routes

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tunegate_core::{Instance, ResolvedAudio, ResolvedStreams};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VideoParams {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

impl VideoParams {
    fn require(self) -> Result<String, ApiError> {
        self.video_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Missing videoId parameter".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct InstanceResponse {
    pub instance: Instance,
}

/// GET /api/audio?videoId=...
async fn audio(
    State(state): State<AppState>,
    params: Result<Query<VideoParams>, QueryRejection>,
) -> Result<Json<ResolvedAudio>, ApiError> {
    let Query(params) = params?;
    let video_id = params.require()?;
    Ok(Json(state.streams.audio(&video_id).await?))
}

/// GET /api/streams?videoId=...
async fn streams(
    State(state): State<AppState>,
    params: Result<Query<VideoParams>, QueryRejection>,
) -> Result<Json<ResolvedStreams>, ApiError> {
    let Query(params) = params?;
    let video_id = params.require()?;
    Ok(Json(state.streams.streams(&video_id).await?))
}

/// GET /api/instance
async fn instance(State(state): State<AppState>) -> Json<InstanceResponse> {
    Json(InstanceResponse {
        instance: state.streams.select_instance().await,
    })
}

/// Create stream routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/audio", get(audio))
        .route("/api/streams", get(streams))
        .route("/api/instance", get(instance))
}
