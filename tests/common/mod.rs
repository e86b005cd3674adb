#![allow(dead_code)]

use answer_worker::broker::{ JobQueue, ResultStore };
use answer_worker::engine::{ AnswerAdapter, AnswerEngine };
use answer_worker::error::WorkerError;
use answer_worker::models::chat::Turn;
use answer_worker::queue::QueueListener;
use answer_worker::store::ResultPublisher;
use answer_worker::worker::Worker;
use async_trait::async_trait;
use std::collections::{ HashMap, VecDeque };
use std::error::Error as StdError;
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// In-memory queue. Popping from an empty queue raises the shutdown flag so
/// the worker loop ends once everything queued has been handled.
pub struct MemoryQueue {
    items: Mutex<VecDeque<Vec<u8>>>,
    pops: Mutex<Vec<Instant>>,
    shutdown: watch::Sender<bool>,
}

impl MemoryQueue {
    pub fn new(payloads: &[&str], shutdown: watch::Sender<bool>) -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(payloads.iter().map(|p| p.as_bytes().to_vec()).collect()),
            pops: Mutex::new(Vec::new()),
            shutdown,
        })
    }

    pub fn remaining(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn pop_times(&self) -> Vec<Instant> {
        self.pops.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn pop(&self, _timeout: Duration) -> Result<Option<Vec<u8>>, WorkerError> {
        self.pops.lock().unwrap().push(Instant::now());
        let next = self.items.lock().unwrap().pop_front();
        if next.is_none() {
            let _ = self.shutdown.send(true);
        }
        Ok(next)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, Instant)>>,
}

impl MemoryStore {
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn write_times(&self) -> Vec<Instant> {
        self.writes.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), WorkerError> {
        self.values.lock().unwrap().insert(key.to_string(), value.to_string());
        self.writes.lock().unwrap().push((key.to_string(), Instant::now()));
        Ok(())
    }
}

pub struct FailingStore;

#[async_trait]
impl ResultStore for FailingStore {
    async fn set(&self, _key: &str, _value: &str) -> Result<(), WorkerError> {
        Err(WorkerError::Transport(redis::RedisError::from((redis::ErrorKind::IoError, "connection reset"))))
    }
}

type Script = dyn Fn(&str, &[Turn]) -> Result<String, String> + Send + Sync;

/// Engine driven by a closure; records every call it receives.
pub struct ScriptedEngine {
    script: Box<Script>,
    calls: Mutex<Vec<(String, Vec<Turn>)>>,
}

impl ScriptedEngine {
    pub fn new(
        script: impl Fn(&str, &[Turn]) -> Result<String, String> + Send + Sync + 'static
    ) -> Arc<Self> {
        Arc::new(Self { script: Box::new(script), calls: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> Vec<(String, Vec<Turn>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerEngine for ScriptedEngine {
    async fn answer(
        &self,
        query: &str,
        history: &[Turn]
    ) -> Result<String, Box<dyn StdError + Send + Sync>> {
        self.calls.lock().unwrap().push((query.to_string(), history.to_vec()));
        (self.script)(query, history).map_err(|e| e.into())
    }
}

pub fn worker(
    queue: Arc<dyn JobQueue>,
    engine: Arc<dyn AnswerEngine>,
    store: Arc<dyn ResultStore>,
    sleep: Duration
) -> Worker {
    Worker::new(
        QueueListener::new(queue, Duration::from_millis(10)),
        AnswerAdapter::new(engine),
        ResultPublisher::new(store),
        sleep
    )
}
