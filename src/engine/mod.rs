pub mod llm;

use async_trait::async_trait;
use futures::FutureExt;
use log::{ info, warn };
use std::any::Any;
use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use crate::error::EngineFailure;
use crate::models::chat::Turn;

pub use self::llm::LlmAnswerEngine;

/// Published in place of an answer whenever the engine fails.
pub const DEGRADED_RESPONSE: &str =
    "I am sorry, I cannot answer at the moment. Please try again later";

/// Maps a query plus prior turns to an answer.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    async fn answer(
        &self,
        query: &str,
        history: &[Turn]
    ) -> Result<String, Box<dyn StdError + Send + Sync>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Answered(String),
    Degraded(EngineFailure),
}

impl AnswerOutcome {
    /// The string that goes into the result store.
    pub fn content(&self) -> &str {
        match self {
            AnswerOutcome::Answered(text) => text,
            AnswerOutcome::Degraded(_) => DEGRADED_RESPONSE,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AnswerOutcome::Degraded(_))
    }
}

/// Calls the engine exactly once and never lets a failure escape.
///
/// Errors, panics and (when configured) deadline overruns all become
/// [`AnswerOutcome::Degraded`]; the published text is then [`DEGRADED_RESPONSE`].
pub struct AnswerAdapter {
    engine: Arc<dyn AnswerEngine>,
    timeout: Option<Duration>,
}

impl AnswerAdapter {
    pub fn new(engine: Arc<dyn AnswerEngine>) -> Self {
        Self { engine, timeout: None }
    }

    /// A zero duration leaves the call unbounded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout).filter(|t| !t.is_zero());
        self
    }

    pub async fn answer(&self, query: &str, history: &[Turn]) -> AnswerOutcome {
        info!("Answer engine running ({} prior turn(s))", history.len());
        let call = AssertUnwindSafe(self.engine.answer(query, history)).catch_unwind();

        let result = match self.timeout {
            Some(limit) =>
                match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => {
                        return degraded(EngineFailure::Timeout(limit));
                    }
                }
            None => call.await,
        };

        match result {
            Ok(Ok(text)) => AnswerOutcome::Answered(text),
            Ok(Err(e)) => degraded(EngineFailure::Provider(e.to_string())),
            Err(payload) => degraded(EngineFailure::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

fn degraded(failure: EngineFailure) -> AnswerOutcome {
    warn!("Answer engine failed ({}): {}", failure.kind(), failure);
    AnswerOutcome::Degraded(failure)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
