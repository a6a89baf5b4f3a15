//! Bounded pool for blocking calls
//!
//! Catalog calls block their thread. They run on tokio's blocking threads,
//! but never more than `workers` at a time, so a request surge cannot turn
//! into an unbounded number of concurrent catalog calls.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::error::CoreError;

pub struct BlockingPool {
    permits: Arc<Semaphore>,
    workers: usize,
}

impl BlockingPool {
    pub fn new(workers: usize) -> Result<Self, CoreError> {
        if workers == 0 {
            return Err(CoreError::Config(
                "worker pool needs at least one worker".to_string(),
            ));
        }

        info!("Initializing blocking pool with {} workers", workers);

        Ok(Self {
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task` on a pool worker and wait for its result
    ///
    /// A failing or panicking task only affects this caller.
    pub async fn run<F, T, E>(&self, task: F) -> Result<T, CoreError>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<CoreError> + Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| CoreError::Pool(e.to_string()))?;

        // The permit travels with the task so the slot is held until the
        // blocking call returns, even if this caller goes away.
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            task()
        });

        match handle.await {
            Ok(result) => result.map_err(Into::into),
            Err(e) => {
                warn!("Blocking task failed: {}", e);
                Err(CoreError::Pool(e.to_string()))
            }
        }
    }
}
