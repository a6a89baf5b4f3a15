//! tunegate REST API
//!
//! This crate provides the Axum-based HTTP surface: catalog lookups, stream
//! resolution, instance selection and cache management.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
