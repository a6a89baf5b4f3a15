//! API error types

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tunegate_core::CoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::Core(e) => match e {
                CoreError::StreamUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
                // Catalog failures carry the provider's message to the caller
                CoreError::Catalog(inner) => (StatusCode::BAD_REQUEST, inner.to_string()),
                CoreError::Pool(_) | CoreError::Config(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
        };

        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        }

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
