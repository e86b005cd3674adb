pub mod ollama;
pub mod openai;
pub mod hosted;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;
use std::sync::Arc;
use super::{ LlmConfig, LlmType };
use crate::models::chat::{ Role, Turn };
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;
use self::hosted::RllmChatClient;

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

/// Role/content pair in the shape every chat-completions style API accepts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

/// A full chat request: an optional system prompt and the turns in order,
/// ending with the user's current query.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub system: Option<String>,
    pub turns: Vec<Turn>,
}

impl ChatRequest {
    pub fn new(system: Option<String>, history: &[Turn], query: &str) -> Self {
        let mut turns = history.to_vec();
        turns.push(Turn::new(Role::User, query));
        Self { system, turns }
    }

    /// System prompt first (when set), then the turns.
    pub fn to_wire_messages(&self) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        if let Some(system) = self.system.as_deref().filter(|s| !s.trim().is_empty()) {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.extend(
            self.turns.iter().map(|t| WireMessage {
                role: t.role.as_str().to_string(),
                content: t.content.clone(),
            })
        );
        messages
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(
        &self,
        request: &ChatRequest
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::OpenAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::Anthropic | LlmType::Gemini | LlmType::DeepSeek | LlmType::XAI | LlmType::Groq => {
            let specific_client = RllmChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}
