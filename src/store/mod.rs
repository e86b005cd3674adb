use log::info;
use std::sync::Arc;

use crate::broker::ResultStore;
use crate::error::WorkerError;
use crate::models::job::JobResult;

/// Writes answers to the result store keyed by job id. Fire-and-forget.
pub struct ResultPublisher {
    store: Arc<dyn ResultStore>,
}

impl ResultPublisher {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        Self { store }
    }

    pub async fn publish(&self, id: &str, content: &str) -> Result<(), WorkerError> {
        let result = JobResult { content: content.to_string() };
        let json = serde_json::to_string(&result).map_err(WorkerError::Serialize)?;
        self.store.set(id, &json).await?;
        info!("Published result for job '{}' ({} chars)", id, content.len());
        Ok(())
    }
}
