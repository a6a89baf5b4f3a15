//! Wire models returned by mirror instances

use serde::{Deserialize, Serialize};

/// One playable audio or video rendition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamVariant {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub quality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
}

impl StreamVariant {
    /// A variant is usable when it points somewhere
    pub fn is_usable(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Stream listing for one content identifier, as produced by a single mirror
///
/// Mirrors return many more fields than these; anything not listed here is
/// ignored during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescriptor {
    #[serde(default)]
    pub audio_streams: Vec<StreamVariant>,
    #[serde(default)]
    pub video_streams: Vec<StreamVariant>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub uploader: String,
    #[serde(default)]
    pub uploader_url: String,
}

impl StreamDescriptor {
    /// First audio variant with a playable URL
    pub fn best_audio(&self) -> Option<&StreamVariant> {
        self.audio_streams.iter().find(|v| v.is_usable())
    }

    /// Whether any audio or video variant is playable
    pub fn has_usable_variant(&self) -> bool {
        self.audio_streams
            .iter()
            .chain(self.video_streams.iter())
            .any(StreamVariant::is_usable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(url: &str) -> StreamVariant {
        StreamVariant {
            url: url.to_string(),
            mime_type: "audio/mp4".to_string(),
            quality: "128 kbps".to_string(),
            codec: None,
            format: None,
            bitrate: None,
        }
    }

    #[test]
    fn test_deserialize_mirror_payload() {
        let body = r#"{
            "title": "Song",
            "uploader": "Artist",
            "uploaderUrl": "/channel/abc",
            "hls": "ignored",
            "audioStreams": [
                {
                    "url": "https://a/1",
                    "mimeType": "audio/webm",
                    "quality": "160 kbps",
                    "codec": "opus",
                    "bitrate": 160000
                }
            ]
        }"#;

        let descriptor: StreamDescriptor = serde_json::from_str(body).unwrap();
        assert_eq!(descriptor.title, "Song");
        assert_eq!(descriptor.description, "");
        assert_eq!(descriptor.uploader_url, "/channel/abc");
        assert!(descriptor.video_streams.is_empty());
        assert_eq!(descriptor.audio_streams[0].mime_type, "audio/webm");
        assert_eq!(descriptor.audio_streams[0].bitrate, Some(160000));
    }

    #[test]
    fn test_best_audio_skips_blank_urls() {
        let descriptor = StreamDescriptor {
            audio_streams: vec![variant(""), variant("https://a/2")],
            ..Default::default()
        };
        assert_eq!(descriptor.best_audio().unwrap().url, "https://a/2");
    }

    #[test]
    fn test_has_usable_variant() {
        let empty = StreamDescriptor::default();
        assert!(!empty.has_usable_variant());

        let video_only = StreamDescriptor {
            video_streams: vec![variant("https://v/1")],
            ..Default::default()
        };
        assert!(video_only.has_usable_variant());
        assert!(video_only.best_audio().is_none());
    }
}
