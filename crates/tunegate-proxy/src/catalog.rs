//! Catalog provider client
//!
//! The catalog provider answers every metadata question (search, songs,
//! artists, albums, playlists, lyrics, moods). Its calls are blocking; callers
//! are expected to run them on a blocking pool.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::CatalogError;

/// Arguments of a watch-playlist lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchPlaylistRequest {
    pub video_id: Option<String>,
    pub playlist_id: Option<String>,
    pub limit: u32,
    pub radio: bool,
    pub shuffle: bool,
}

/// Blocking metadata client
///
/// Every method returns the provider's JSON document untouched.
pub trait CatalogClient: Send + Sync {
    fn search(&self, query: &str, filter: Option<&str>, limit: u32) -> Result<Value, CatalogError>;
    fn search_suggestions(&self, query: &str) -> Result<Value, CatalogError>;
    fn song(&self, video_id: &str) -> Result<Value, CatalogError>;
    fn artist(&self, channel_id: &str) -> Result<Value, CatalogError>;
    fn playlist(&self, playlist_id: &str, limit: u32) -> Result<Value, CatalogError>;
    fn album(&self, browse_id: &str) -> Result<Value, CatalogError>;
    fn lyrics(&self, browse_id: &str) -> Result<Value, CatalogError>;
    fn watch_playlist(&self, request: &WatchPlaylistRequest) -> Result<Value, CatalogError>;
    fn song_related(&self, browse_id: &str) -> Result<Value, CatalogError>;
    fn mood_categories(&self) -> Result<Value, CatalogError>;
    fn mood_playlists(&self, params: &str) -> Result<Value, CatalogError>;
}

/// Remote catalog configuration
#[derive(Clone, Debug)]
pub struct RemoteCatalogConfig {
    /// Base URL of the catalog sidecar
    pub base_url: String,
    /// Read timeout for a single call
    pub timeout: Duration,
}

/// Catalog client backed by a JSON-over-HTTP sidecar
pub struct RemoteCatalog {
    base_url: String,
    agent: ureq::Agent,
}

impl RemoteCatalog {
    pub fn new(config: RemoteCatalogConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(config.timeout)
            .timeout_write(config.timeout)
            .build();

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        info!("Created catalog client for {}", base_url);

        Self { base_url, agent }
    }

    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Catalog request: {} {:?}", url, params);

        let mut request = self.agent.get(&url);
        for (key, value) in params {
            request = request.query(key, value);
        }

        let response = request.call()?;
        response
            .into_json::<Value>()
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    fn segment(id: &str) -> String {
        urlencoding::encode(id).into_owned()
    }
}

impl CatalogClient for RemoteCatalog {
    fn search(&self, query: &str, filter: Option<&str>, limit: u32) -> Result<Value, CatalogError> {
        let mut params = vec![("query", query.to_string()), ("limit", limit.to_string())];
        if let Some(filter) = filter {
            params.push(("filter", filter.to_string()));
        }
        self.get("/search", &params)
    }

    fn search_suggestions(&self, query: &str) -> Result<Value, CatalogError> {
        self.get("/search/suggestions", &[("query", query.to_string())])
    }

    fn song(&self, video_id: &str) -> Result<Value, CatalogError> {
        self.get(&format!("/song/{}", Self::segment(video_id)), &[])
    }

    fn artist(&self, channel_id: &str) -> Result<Value, CatalogError> {
        self.get(&format!("/artist/{}", Self::segment(channel_id)), &[])
    }

    fn playlist(&self, playlist_id: &str, limit: u32) -> Result<Value, CatalogError> {
        self.get(
            &format!("/playlist/{}", Self::segment(playlist_id)),
            &[("limit", limit.to_string())],
        )
    }

    fn album(&self, browse_id: &str) -> Result<Value, CatalogError> {
        self.get(&format!("/album/{}", Self::segment(browse_id)), &[])
    }

    fn lyrics(&self, browse_id: &str) -> Result<Value, CatalogError> {
        self.get(&format!("/lyrics/{}", Self::segment(browse_id)), &[])
    }

    fn watch_playlist(&self, request: &WatchPlaylistRequest) -> Result<Value, CatalogError> {
        let mut params = vec![
            ("limit", request.limit.to_string()),
            ("radio", request.radio.to_string()),
            ("shuffle", request.shuffle.to_string()),
        ];
        if let Some(video_id) = &request.video_id {
            params.push(("videoId", video_id.clone()));
        }
        if let Some(playlist_id) = &request.playlist_id {
            params.push(("playlistId", playlist_id.clone()));
        }
        self.get("/watch_playlist", &params)
    }

    fn song_related(&self, browse_id: &str) -> Result<Value, CatalogError> {
        self.get(&format!("/song_related/{}", Self::segment(browse_id)), &[])
    }

    fn mood_categories(&self) -> Result<Value, CatalogError> {
        self.get("/mood_categories", &[])
    }

    fn mood_playlists(&self, params: &str) -> Result<Value, CatalogError> {
        self.get("/mood_playlists", &[("params", params.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubServer, closed_url};
    use serde_json::json;

    fn catalog(base_url: &str) -> RemoteCatalog {
        RemoteCatalog::new(RemoteCatalogConfig {
            base_url: format!("{}/", base_url),
            timeout: Duration::from_secs(5),
        })
    }

    #[test]
    fn test_document_is_returned_untouched() {
        let server = StubServer::start(200, r#"{"videoDetails": {"title": "Song"}}"#);

        let song = catalog(server.url()).song("v1").unwrap();

        assert_eq!(song, json!({"videoDetails": {"title": "Song"}}));
        assert_eq!(server.requests(), vec!["GET /song/v1 HTTP/1.1"]);
    }

    #[test]
    fn test_error_status_carries_provider_message() {
        let server = StubServer::start(404, "no such artist");

        let error = catalog(server.url()).artist("UC1").unwrap_err();

        assert!(matches!(error, CatalogError::Upstream { status: 404, .. }));
        assert_eq!(error.to_string(), "no such artist");
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let server = StubServer::start(200, "not json");

        let error = catalog(server.url()).lyrics("MPLY1").unwrap_err();
        assert!(matches!(error, CatalogError::Decode(_)));
    }

    #[test]
    fn test_unreachable_provider_is_transport_error() {
        let error = catalog(&closed_url()).mood_categories().unwrap_err();
        assert!(matches!(error, CatalogError::Transport(_)));
    }

    #[test]
    fn test_path_ids_are_encoded() {
        let server = StubServer::start(200, "{}");

        catalog(server.url()).album("a/b").unwrap();
        assert_eq!(server.requests(), vec!["GET /album/a%2Fb HTTP/1.1"]);
    }

    #[test]
    fn test_query_parameters() {
        let server = StubServer::start(200, "[]");
        let client = catalog(server.url());

        client.search("hello", Some("songs"), 20).unwrap();
        client.playlist("PL1", 5).unwrap();
        client
            .watch_playlist(&WatchPlaylistRequest {
                video_id: Some("v9".to_string()),
                playlist_id: None,
                limit: 25,
                radio: true,
                shuffle: false,
            })
            .unwrap();

        assert_eq!(
            server.requests(),
            vec![
                "GET /search?query=hello&limit=20&filter=songs HTTP/1.1",
                "GET /playlist/PL1?limit=5 HTTP/1.1",
                "GET /watch_playlist?limit=25&radio=true&shuffle=false&videoId=v9 HTTP/1.1",
            ]
        );
    }
}
