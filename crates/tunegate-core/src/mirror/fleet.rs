//! Mirror fleet: availability probing and instance selection

use rand::seq::IndexedRandom;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tunegate_proxy::MirrorBackend;

use super::registry::{Instance, MirrorRegistry};
use crate::config::MirrorConfig;
use crate::error::CoreError;

/// The registered mirrors plus the client used to reach them
///
/// Health is never remembered between calls: every selection probes the
/// whole fleet again.
pub struct MirrorFleet {
    registry: MirrorRegistry,
    backend: Arc<dyn MirrorBackend>,
    probe_timeout: Duration,
    pub(super) fetch_timeout: Duration,
}

impl MirrorFleet {
    pub fn new(
        registry: MirrorRegistry,
        backend: Arc<dyn MirrorBackend>,
        probe_timeout: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        info!(
            "Mirror fleet: {} instances (probe timeout: {:?}, fetch timeout: {:?})",
            registry.len(),
            probe_timeout,
            fetch_timeout
        );

        Self {
            registry,
            backend,
            probe_timeout,
            fetch_timeout,
        }
    }

    /// Build a fleet from configuration
    pub fn from_config(
        config: &MirrorConfig,
        backend: Arc<dyn MirrorBackend>,
    ) -> Result<Self, CoreError> {
        let registry = MirrorRegistry::new(&config.instances)?;
        Ok(Self::new(
            registry,
            backend,
            config.probe_timeout(),
            config.fetch_timeout(),
        ))
    }

    pub fn registry(&self) -> &MirrorRegistry {
        &self.registry
    }

    pub(super) fn backend(&self) -> &dyn MirrorBackend {
        self.backend.as_ref()
    }

    // ==================== Availability ====================

    /// Check every instance in parallel and return the healthy ones
    ///
    /// Errors, timeouts and non-2xx replies all count as unhealthy. The
    /// result keeps registration order.
    pub async fn probe_all(&self) -> Vec<Instance> {
        let checks = self.registry.instances().iter().map(|instance| async move {
            let healthy = self.probe_one(instance).await;
            (instance, healthy)
        });

        let results = futures::future::join_all(checks).await;
        metrics::counter!("tunegate_health_checks_total").increment(results.len() as u64);

        let healthy: Vec<Instance> = results
            .into_iter()
            .filter(|(_, healthy)| *healthy)
            .map(|(instance, _)| instance.clone())
            .collect();

        debug!(
            "Probe round: {}/{} instances healthy",
            healthy.len(),
            self.registry.len()
        );
        healthy
    }

    async fn probe_one(&self, instance: &Instance) -> bool {
        let check = self.backend.healthcheck(instance.as_str());
        match tokio::time::timeout(self.probe_timeout, check).await {
            Ok(Ok(true)) => true,
            Ok(Ok(false)) => {
                debug!("Instance {} reported unhealthy", instance);
                false
            }
            Ok(Err(e)) => {
                debug!("Healthcheck failed for {}: {}", instance, e);
                false
            }
            Err(_) => {
                debug!("Healthcheck timed out for {}", instance);
                false
            }
        }
    }

    // ==================== Selection ====================

    /// Pick one instance to use as the preferred endpoint
    ///
    /// Chooses uniformly among healthy instances, or among all registered
    /// instances when none are healthy. Never fails.
    pub async fn select_instance(&self) -> Instance {
        let healthy = self.probe_all().await;

        let mut rng = rand::rng();
        match healthy.choose(&mut rng) {
            Some(instance) => instance.clone(),
            None => {
                warn!("No healthy mirror instance, falling back to any registered instance");
                self.registry.random(&mut rng).clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::testing::{FakeMirror, MirrorBehaviour};

    fn fleet(fake: FakeMirror, urls: &[&str]) -> MirrorFleet {
        MirrorFleet::new(
            MirrorRegistry::new(urls).unwrap(),
            Arc::new(fake),
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_classifies_each_failure_mode() {
        let fake = FakeMirror::new()
            .with("https://ok", MirrorBehaviour::healthy())
            .with("https://down", MirrorBehaviour::Unhealthy)
            .with("https://broken", MirrorBehaviour::Error)
            .with("https://slow", MirrorBehaviour::Hang)
            .with("https://ok2", MirrorBehaviour::healthy());

        let fleet = fleet(
            fake,
            &["https://ok", "https://down", "https://broken", "https://slow", "https://ok2"],
        );

        let healthy = fleet.probe_all().await;
        assert_eq!(healthy, vec![Instance::new("https://ok"), Instance::new("https://ok2")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_runs_in_parallel() {
        let fake = FakeMirror::new()
            .with("https://a", MirrorBehaviour::Hang)
            .with("https://b", MirrorBehaviour::Hang)
            .with("https://c", MirrorBehaviour::Hang);
        let fleet = fleet(fake, &["https://a", "https://b", "https://c"]);

        let started = tokio::time::Instant::now();
        assert!(fleet.probe_all().await.is_empty());
        assert!(started.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_prefers_healthy() {
        let fake = FakeMirror::new()
            .with("https://a", MirrorBehaviour::Unhealthy)
            .with("https://b", MirrorBehaviour::healthy())
            .with("https://c", MirrorBehaviour::Error);
        let fleet = fleet(fake, &["https://a", "https://b", "https://c"]);

        for _ in 0..10 {
            assert_eq!(fleet.select_instance().await, Instance::new("https://b"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_falls_back_when_all_unhealthy() {
        let fake = FakeMirror::new()
            .with("https://a", MirrorBehaviour::Error)
            .with("https://b", MirrorBehaviour::Hang);
        let fleet = fleet(fake, &["https://a", "https://b"]);

        let selected = fleet.select_instance().await;
        assert!(fleet.registry().instances().contains(&selected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_reprobes_every_call() {
        let fake = Arc::new(FakeMirror::new().with("https://a", MirrorBehaviour::healthy()));
        let fleet = MirrorFleet::new(
            MirrorRegistry::new(["https://a"]).unwrap(),
            fake.clone(),
            Duration::from_secs(5),
            Duration::from_secs(5),
        );

        fleet.select_instance().await;
        fleet.select_instance().await;
        assert_eq!(fake.healthchecks(), 2);
    }
}
