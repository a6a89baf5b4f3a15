//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] tunegate_proxy::CatalogError),

    #[error("No stream available for {0}")]
    StreamUnavailable(String),

    #[error("Worker pool error: {0}")]
    Pool(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
