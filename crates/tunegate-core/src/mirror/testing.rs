//! In-memory mirror backend for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tunegate_proxy::{MirrorBackend, ProxyError, StreamDescriptor, StreamVariant};

#[derive(Clone)]
pub(crate) enum MirrorBehaviour {
    /// Healthy, answers stream requests after `delay`
    Serve {
        descriptor: StreamDescriptor,
        delay: Duration,
    },
    /// Healthcheck returns a non-2xx status
    Unhealthy,
    /// Every request fails immediately
    Error,
    /// Every request outlives any timeout
    Hang,
}

impl MirrorBehaviour {
    pub(crate) fn healthy() -> Self {
        Self::Serve {
            descriptor: StreamDescriptor::default(),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn serve(descriptor: StreamDescriptor) -> Self {
        Self::Serve {
            descriptor,
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn serve_after(descriptor: StreamDescriptor, delay: Duration) -> Self {
        Self::Serve { descriptor, delay }
    }
}

pub(crate) fn audio(url: &str) -> StreamVariant {
    StreamVariant {
        url: url.to_string(),
        mime_type: "audio/webm".to_string(),
        quality: "160 kbps".to_string(),
        codec: Some("opus".to_string()),
        format: None,
        bitrate: None,
    }
}

pub(crate) fn descriptor_with_audio(url: &str) -> StreamDescriptor {
    StreamDescriptor {
        audio_streams: vec![audio(url)],
        title: format!("title from {url}"),
        ..Default::default()
    }
}

#[derive(Default)]
pub(crate) struct FakeMirror {
    behaviours: HashMap<String, MirrorBehaviour>,
    healthchecks: AtomicUsize,
    stream_requests: AtomicUsize,
}

impl FakeMirror {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, instance: &str, behaviour: MirrorBehaviour) -> Self {
        self.behaviours.insert(instance.to_string(), behaviour);
        self
    }

    pub(crate) fn healthchecks(&self) -> usize {
        self.healthchecks.load(Ordering::SeqCst)
    }

    pub(crate) fn stream_requests(&self) -> usize {
        self.stream_requests.load(Ordering::SeqCst)
    }

    fn behaviour(&self, instance: &str) -> MirrorBehaviour {
        self.behaviours
            .get(instance)
            .cloned()
            .unwrap_or(MirrorBehaviour::Error)
    }
}

#[async_trait]
impl MirrorBackend for FakeMirror {
    async fn healthcheck(&self, instance: &str) -> Result<bool, ProxyError> {
        self.healthchecks.fetch_add(1, Ordering::SeqCst);
        match self.behaviour(instance) {
            MirrorBehaviour::Serve { .. } => Ok(true),
            MirrorBehaviour::Unhealthy => Ok(false),
            MirrorBehaviour::Error => Err(ProxyError::InvalidResponse("connection refused".into())),
            MirrorBehaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(true)
            }
        }
    }

    async fn streams(&self, instance: &str, _id: &str) -> Result<StreamDescriptor, ProxyError> {
        self.stream_requests.fetch_add(1, Ordering::SeqCst);
        match self.behaviour(instance) {
            MirrorBehaviour::Serve { descriptor, delay } => {
                tokio::time::sleep(delay).await;
                Ok(descriptor)
            }
            MirrorBehaviour::Unhealthy => Err(ProxyError::UpstreamError {
                status: 502,
                message: "bad gateway".into(),
            }),
            MirrorBehaviour::Error => Err(ProxyError::InvalidResponse("connection refused".into())),
            MirrorBehaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(StreamDescriptor::default())
            }
        }
    }
}
