pub mod redis;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::WorkerError;

pub use self::redis::RedisBroker;

/// A FIFO list in the shared broker that this worker pops from.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Waits up to `timeout` for one payload and removes it from the queue.
    ///
    /// `Ok(None)` means the wait elapsed with nothing to pop.
    async fn pop(&self, timeout: Duration) -> Result<Option<Vec<u8>>, WorkerError>;
}

/// The shared key-value store results are written to.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Stores `value` under `key`, replacing anything already there. No expiry.
    async fn set(&self, key: &str, value: &str) -> Result<(), WorkerError>;
}
