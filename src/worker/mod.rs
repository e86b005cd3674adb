use log::info;
use std::time::Duration;
use tokio::sync::watch;

use crate::engine::{ AnswerAdapter, AnswerOutcome };
use crate::error::{ ProtocolError, WorkerError };
use crate::history::build_chat_history;
use crate::models::job::Job;
use crate::queue::QueueListener;
use crate::store::ResultPublisher;

/// Sequential consumer: pop, build history, answer, publish, sleep, repeat.
///
/// Shutdown is only observed between jobs (after a poll times out or during
/// the backpressure sleep). A job that has been popped is always published.
pub struct Worker {
    listener: QueueListener,
    adapter: AnswerAdapter,
    publisher: ResultPublisher,
    sleep: Duration,
}

impl Worker {
    pub fn new(
        listener: QueueListener,
        adapter: AnswerAdapter,
        publisher: ResultPublisher,
        sleep: Duration
    ) -> Self {
        Self { listener, adapter, publisher, sleep }
    }

    /// Runs one job through history building, the engine and the publisher.
    pub async fn process(&self, job: &Job) -> Result<AnswerOutcome, WorkerError> {
        let (history, query) = build_chat_history(&job.messages).ok_or_else(||
            ProtocolError::EmptyMessages(job.id.clone())
        )?;
        let outcome = self.adapter.answer(query, &history).await;
        self.publisher.publish(&job.id, outcome.content()).await?;
        Ok(outcome)
    }

    /// Loops until `shutdown` turns `true`. Protocol and transport errors end the
    /// loop immediately and are returned to the caller.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), WorkerError> {
        info!("Waiting for queries...");
        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let Some(job) = self.listener.next_job().await? else {
                continue;
            };
            let outcome = self.process(&job).await?;
            if !outcome.is_degraded() {
                info!("Job '{}' answered", job.id);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.sleep) => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }
        info!("Shutdown requested, worker stopped");
        Ok(())
    }
}

/// Resolves once the flag is set. A dropped sender means it never will be.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            futures::future::pending::<()>().await;
        }
    }
}
