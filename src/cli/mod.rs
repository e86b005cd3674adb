use clap::Parser;
use std::time::Duration;
use url::Url;

use crate::error::WorkerError;
use crate::llm::{ LlmConfig, LlmType };

pub const MIN_POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// Rejects negative, non-finite and out-of-range values instead of panicking.
fn seconds(name: &str, value: f64) -> Result<Duration, WorkerError> {
    Duration::try_from_secs_f64(value).map_err(|e|
        WorkerError::Config(format!("{} must be a non-negative number of seconds, got {}: {}", name, value, e))
    )
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Broker Args ---
    /// Broker host (Redis)
    #[arg(long, env = "REDIS_IP", default_value = "127.0.0.1")]
    pub redis_host: String,

    /// Broker port
    #[arg(long, env = "REDIS_PORT", default_value = "6379")]
    pub redis_port: u16,

    /// Logical database index on the broker
    #[arg(long, env = "REDIS_DB_ID", default_value = "0")]
    pub redis_db: u32,

    /// Optional broker password
    #[arg(long, env = "REDIS_PASSWORD")]
    pub redis_password: Option<String>,

    /// Name of the list jobs are pushed onto
    #[arg(long, env = "REDIS_QUEUE", default_value = "service_queue")]
    pub queue: String,

    // --- Loop Args ---
    /// Seconds to sleep after each published result (fractions allowed)
    #[arg(long, env = "SERVER_SLEEP", default_value = "0.05")]
    pub sleep_secs: f64,

    /// Seconds a single queue pop waits before checking for shutdown
    #[arg(long, env = "POLL_TIMEOUT", default_value = "1")]
    pub poll_timeout_secs: f64,

    /// Deadline for one answer engine call in seconds. 0 disables it.
    #[arg(long, env = "ENGINE_TIMEOUT", default_value = "0")]
    pub engine_timeout_secs: f64,

    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (ollama, openai, anthropic, gemini, deepseek, xai, groq)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "ollama")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider
    #[arg(long, env = "CHAT_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gpt-4o, llama3)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// System prompt sent ahead of the conversation. Empty string sends none.
    #[arg(long, env = "SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,
}

impl Args {
    pub fn validate(&self) -> Result<(), WorkerError> {
        self.sleep()?;
        self.poll_timeout()?;
        self.engine_timeout()?;
        if self.queue.is_empty() {
            return Err(WorkerError::Config("queue name must not be empty".to_string()));
        }
        self.llm_type()?;
        Ok(())
    }

    pub fn sleep(&self) -> Result<Duration, WorkerError> {
        seconds("sleep", self.sleep_secs)
    }

    /// At least [`MIN_POLL_TIMEOUT`]; a BRPOP timeout of 0 would block forever.
    pub fn poll_timeout(&self) -> Result<Duration, WorkerError> {
        let timeout = seconds("poll timeout", self.poll_timeout_secs)?;
        if timeout < MIN_POLL_TIMEOUT {
            return Err(
                WorkerError::Config(
                    format!(
                        "poll timeout must be at least {:?}, got {} seconds",
                        MIN_POLL_TIMEOUT,
                        self.poll_timeout_secs
                    )
                )
            );
        }
        Ok(timeout)
    }

    /// Zero disables the engine deadline.
    pub fn engine_timeout(&self) -> Result<Duration, WorkerError> {
        seconds("engine timeout", self.engine_timeout_secs)
    }

    pub fn llm_type(&self) -> Result<LlmType, WorkerError> {
        self.chat_llm_type.parse().map_err(|e| WorkerError::Config(format!("{}", e)))
    }

    pub fn llm_config(&self) -> Result<LlmConfig, WorkerError> {
        Ok(LlmConfig {
            llm_type: self.llm_type()?,
            api_key: Some(self.chat_api_key.clone()).filter(|k| !k.is_empty()),
            completion_model: self.chat_model.clone(),
            base_url: self.chat_base_url.clone(),
        })
    }

    /// `None` when explicitly set to an empty string.
    pub fn system_prompt(&self) -> Option<String> {
        match &self.system_prompt {
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(p.clone()),
            None => Some(crate::engine::llm::DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }

    pub fn broker_url(&self) -> Result<Url, WorkerError> {
        let mut url = Url::parse(
            &format!("redis://{}:{}/{}", self.redis_host, self.redis_port, self.redis_db)
        ).map_err(|e| WorkerError::Config(format!("invalid broker address: {}", e)))?;
        if let Some(password) = self.redis_password.as_deref().filter(|p| !p.is_empty()) {
            url
                .set_password(Some(password))
                .map_err(|_| WorkerError::Config("cannot attach password to broker URL".to_string()))?;
        }
        Ok(url)
    }
}
