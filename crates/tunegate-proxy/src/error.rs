//! Proxy error types

use thiserror::Error;

/// Errors talking to a mirror instance
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mirror returned error: {status} - {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors raised by the catalog provider
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog transport error: {0}")]
    Transport(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid catalog response: {0}")]
    Decode(String),
}

impl From<ureq::Error> for CatalogError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, response) => CatalogError::Upstream {
                status,
                message: response
                    .into_string()
                    .unwrap_or_else(|_| format!("catalog returned status {status}")),
            },
            ureq::Error::Transport(transport) => CatalogError::Transport(transport.to_string()),
        }
    }
}
