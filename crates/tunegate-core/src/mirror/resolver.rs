//! Stream resolution across the mirror fleet

use serde::Serialize;
use tracing::{debug, info, warn};
use tunegate_proxy::{StreamDescriptor, StreamVariant};

use super::fleet::MirrorFleet;
use super::registry::Instance;
use crate::error::CoreError;

/// Best audio rendition for a content identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAudio {
    pub audio_url: String,
    pub mime_type: String,
    pub quality: String,
    pub instance: Instance,
}

/// Every rendition a single mirror reported for a content identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStreams {
    pub video_streams: Vec<StreamVariant>,
    pub audio_streams: Vec<StreamVariant>,
    pub instance: Instance,
    pub title: String,
    pub description: String,
    pub uploader: String,
    pub uploader_url: String,
}

impl MirrorFleet {
    /// Fetch stream descriptors from every registered instance
    ///
    /// All instances are asked, healthy or not, and all answers are awaited.
    /// A failed or timed-out fetch yields `None` for that instance. The
    /// result is in registration order.
    pub async fn fetch_all(&self, id: &str) -> Vec<(Instance, Option<StreamDescriptor>)> {
        let fetches = self.registry().instances().iter().map(|instance| async move {
            let descriptor = self.fetch_one(instance, id).await;
            (instance.clone(), descriptor)
        });

        futures::future::join_all(fetches).await
    }

    async fn fetch_one(&self, instance: &Instance, id: &str) -> Option<StreamDescriptor> {
        let fetch = self.backend().streams(instance.as_str(), id);
        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(descriptor)) => Some(descriptor),
            Ok(Err(e)) => {
                debug!("Stream fetch for {} failed on {}: {}", id, instance, e);
                None
            }
            Err(_) => {
                debug!("Stream fetch for {} timed out on {}", id, instance);
                None
            }
        }
    }

    /// Resolve the best audio stream for `id`
    ///
    /// Returns the first audio variant of the first instance, in registration
    /// order, that answered with a usable audio variant.
    pub async fn resolve_audio(&self, id: &str) -> Result<ResolvedAudio, CoreError> {
        let results = self.fetch_all(id).await;

        let resolved = results.into_iter().find_map(|(instance, descriptor)| {
            let variant = descriptor.as_ref()?.best_audio()?;
            Some(ResolvedAudio {
                audio_url: variant.url.clone(),
                mime_type: variant.mime_type.clone(),
                quality: variant.quality.clone(),
                instance,
            })
        });

        Self::finish(id, resolved)
    }

    /// Resolve every stream for `id` from the first instance that has any
    pub async fn resolve_streams(&self, id: &str) -> Result<ResolvedStreams, CoreError> {
        let results = self.fetch_all(id).await;

        let resolved = results
            .into_iter()
            .find_map(|(instance, descriptor)| match descriptor {
                Some(d) if d.has_usable_variant() => Some(ResolvedStreams {
                    video_streams: d.video_streams,
                    audio_streams: d.audio_streams,
                    instance,
                    title: d.title,
                    description: d.description,
                    uploader: d.uploader,
                    uploader_url: d.uploader_url,
                }),
                _ => None,
            });

        Self::finish(id, resolved)
    }

    fn finish<T>(id: &str, resolved: Option<T>) -> Result<T, CoreError> {
        match resolved {
            Some(value) => {
                info!("Resolved streams for {}", id);
                metrics::counter!("tunegate_stream_resolutions_total", "outcome" => "resolved")
                    .increment(1);
                Ok(value)
            }
            None => {
                warn!("No mirror instance could resolve streams for {}", id);
                metrics::counter!("tunegate_stream_resolutions_total", "outcome" => "unavailable")
                    .increment(1);
                Err(CoreError::StreamUnavailable(id.to_string()))
            }
        }
    }
}
