use std::time::Duration;
use thiserror::Error;

/// A job payload that could not be turned into a [`crate::models::job::Job`].
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("job payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("job payload is not a valid job document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("job payload has an empty id")]
    EmptyId,

    #[error("job '{0}' has no messages")]
    EmptyMessages(String),
}

/// Errors that stop the worker loop. None of these are retried.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("broker transport error: {0}")]
    Transport(#[from] redis::RedisError),

    #[error("failed to serialize result: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to set up answer engine: {0}")]
    EngineSetup(String),
}

/// Why the answer engine did not produce an answer. Never leaves the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFailure {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("engine panicked: {0}")]
    Panicked(String),
}

impl EngineFailure {
    /// Short, stable label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineFailure::Provider(_) => "provider",
            EngineFailure::Timeout(_) => "timeout",
            EngineFailure::Panicked(_) => "panic",
        }
    }
}
