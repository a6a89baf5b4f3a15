//! Mirror instance client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ProxyError;
use crate::models::StreamDescriptor;

/// Mirror client configuration
#[derive(Clone, Debug)]
pub struct MirrorClientConfig {
    /// Connect timeout applied to every request
    pub connect_timeout: Duration,
    /// User agent sent to mirrors
    pub user_agent: String,
}

impl Default for MirrorClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            user_agent: concat!("tunegate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// The two calls tunegate makes against a mirror instance
#[async_trait]
pub trait MirrorBackend: Send + Sync {
    /// `GET {instance}/healthcheck`, true on any 2xx
    async fn healthcheck(&self, instance: &str) -> Result<bool, ProxyError>;

    /// `GET {instance}/streams/{id}`
    async fn streams(&self, instance: &str, id: &str) -> Result<StreamDescriptor, ProxyError>;
}

/// HTTP client shared by every mirror instance
pub struct MirrorClient {
    client: Client,
}

impl MirrorClient {
    /// Create a new mirror client
    pub fn new(config: MirrorClientConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent)
            .build()?;

        info!("Created mirror client");

        Ok(Self { client })
    }
}

#[async_trait]
impl MirrorBackend for MirrorClient {
    async fn healthcheck(&self, instance: &str) -> Result<bool, ProxyError> {
        let url = format!("{}/healthcheck", instance);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    async fn streams(&self, instance: &str, id: &str) -> Result<StreamDescriptor, ProxyError> {
        let url = format!("{}/streams/{}", instance, urlencoding::encode(id));

        debug!("Fetching streams: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            return Err(ProxyError::UpstreamError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ProxyError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubServer, closed_url};

    fn client() -> MirrorClient {
        MirrorClient::new(MirrorClientConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_streams_parses_descriptor() {
        let server = StubServer::start(
            200,
            r#"{
                "title": "Song",
                "audioStreams": [{"url": "https://cdn/a", "mimeType": "audio/webm"}]
            }"#,
        );

        let descriptor = client().streams(server.url(), "abc").await.unwrap();

        assert_eq!(descriptor.title, "Song");
        assert_eq!(descriptor.best_audio().unwrap().url, "https://cdn/a");
        assert_eq!(server.requests(), vec!["GET /streams/abc HTTP/1.1"]);
    }

    #[tokio::test]
    async fn test_streams_error_status_keeps_body() {
        let server = StubServer::start(404, r#"{"error": "Video unavailable"}"#);

        match client().streams(server.url(), "gone").await {
            Err(ProxyError::UpstreamError { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, r#"{"error": "Video unavailable"}"#);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_streams_rejects_malformed_json() {
        let server = StubServer::start(200, "<html>not json</html>");

        let result = client().streams(server.url(), "abc").await;
        assert!(matches!(result, Err(ProxyError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_streams_encodes_id() {
        let server = StubServer::start(200, "{}");

        client().streams(server.url(), "a/b c").await.unwrap();
        assert_eq!(server.requests(), vec!["GET /streams/a%2Fb%20c HTTP/1.1"]);
    }

    #[tokio::test]
    async fn test_healthcheck_follows_status() {
        let up = StubServer::start(200, "{}");
        let down = StubServer::start(503, "");

        assert!(client().healthcheck(up.url()).await.unwrap());
        assert!(!client().healthcheck(down.url()).await.unwrap());
        assert_eq!(down.requests(), vec!["GET /healthcheck HTTP/1.1"]);
    }

    #[tokio::test]
    async fn test_unreachable_instance_is_an_error() {
        let result = client().healthcheck(&closed_url()).await;
        assert!(matches!(result, Err(ProxyError::Http(_))));
    }
}
