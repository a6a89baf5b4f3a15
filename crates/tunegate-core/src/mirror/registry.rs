//! Static registry of mirror instances

use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::error::CoreError;

/// Base URL of one mirror instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Instance(String);

impl Instance {
    pub fn new(url: impl AsRef<str>) -> Self {
        Self(url.as_ref().trim().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty list of interchangeable mirror instances
///
/// Registration order is significant: stream resolution prefers earlier
/// instances when several answer.
#[derive(Debug, Clone)]
pub struct MirrorRegistry {
    instances: Vec<Instance>,
}

impl MirrorRegistry {
    pub fn new<I, S>(urls: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut instances: Vec<Instance> = Vec::new();
        for url in urls {
            let instance = Instance::new(url);
            if instance.as_str().is_empty() {
                return Err(CoreError::Config("mirror instance URL is empty".to_string()));
            }
            if !instances.contains(&instance) {
                instances.push(instance);
            }
        }

        if instances.is_empty() {
            return Err(CoreError::Config(
                "at least one mirror instance is required".to_string(),
            ));
        }

        Ok(Self { instances })
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Any instance, uniformly at random
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> &Instance {
        &self.instances[rng.random_range(0..self.instances.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_and_dedupes() {
        let registry =
            MirrorRegistry::new(["https://a.example/", " https://b.example", "https://a.example"])
                .unwrap();

        let urls: Vec<&str> = registry.instances().iter().map(Instance::as_str).collect();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_rejects_empty_registry() {
        assert!(matches!(
            MirrorRegistry::new(Vec::<String>::new()),
            Err(CoreError::Config(_))
        ));
        assert!(MirrorRegistry::new(["  "]).is_err());
    }

    #[test]
    fn test_random_stays_in_registry() {
        let registry = MirrorRegistry::new(["https://a", "https://b", "https://c"]).unwrap();
        let mut rng = rand::rng();
        for _ in 0..50 {
            assert!(registry.instances().contains(registry.random(&mut rng)));
        }
    }
}
