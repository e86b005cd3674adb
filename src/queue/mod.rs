use log::info;
use std::sync::Arc;
use std::time::Duration;

use crate::broker::JobQueue;
use crate::error::WorkerError;
use crate::models::job::Job;

/// Ordered, single-consumer reader of the job queue.
///
/// A popped payload is gone from the queue before it is decoded, so delivery
/// is at-most-once. Decoding failures are returned as fatal protocol errors.
pub struct QueueListener {
    queue: Arc<dyn JobQueue>,
    poll_timeout: Duration,
}

impl QueueListener {
    pub fn new(queue: Arc<dyn JobQueue>, poll_timeout: Duration) -> Self {
        Self { queue, poll_timeout }
    }

    /// Waits one poll interval for the next job.
    pub async fn next_job(&self) -> Result<Option<Job>, WorkerError> {
        let Some(payload) = self.queue.pop(self.poll_timeout).await? else {
            return Ok(None);
        };
        let job = Job::from_payload(&payload)?;
        info!("Received job '{}' with {} message(s)", job.id, job.messages.len());
        Ok(Some(job))
    }
}
