use async_trait::async_trait;
use log::debug;
use rllm::{
    builder::{ LLMBackend, LLMBuilder },
    chat::{ ChatMessage, ChatRole, MessageType },
    LLMProvider,
};
use std::error::Error as StdError;

use super::{ ChatClient, ChatRequest, CompletionResponse };
use crate::llm::{ LlmConfig, LlmType };
use crate::models::chat::Role;

/// Hosted providers reached through `rllm`. A provider is built per call.
pub struct RllmChatClient {
    backend: LLMBackend,
    llm_type: LlmType,
    api_key: String,
    model: String,
    base_url: Option<String>,
}

fn backend_for(llm_type: LlmType) -> Option<(LLMBackend, &'static str)> {
    match llm_type {
        LlmType::Anthropic => Some((LLMBackend::Anthropic, "claude-3-haiku-20240307")),
        LlmType::Gemini => Some((LLMBackend::Google, "gemini-1.5-flash-latest")),
        LlmType::DeepSeek => Some((LLMBackend::DeepSeek, "deepseek-chat")),
        LlmType::XAI => Some((LLMBackend::XAI, "grok-3-latest")),
        LlmType::Groq => Some((LLMBackend::Groq, "llama-3.1-8b-instant")),
        LlmType::Ollama | LlmType::OpenAI => None,
    }
}

impl RllmChatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let (backend, default_model) = backend_for(config.llm_type).ok_or_else(||
            format!("{} is not served by the rllm client", config.llm_type)
        )?;
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| format!("{} API key is required", config.llm_type))?;

        Ok(Self {
            backend,
            llm_type: config.llm_type,
            api_key,
            model: config.completion_model.clone().unwrap_or_else(|| default_model.to_string()),
            base_url: config.base_url.clone(),
        })
    }
}

/// A reply without text (tool calls only, empty candidates) is a provider error.
fn text_or_error(
    text: Option<String>,
    llm_type: LlmType
) -> Result<String, Box<dyn StdError + Send + Sync>> {
    text.ok_or_else(|| format!("{} response contained no text", llm_type).into())
}

#[async_trait]
impl ChatClient for RllmChatClient {
    async fn chat(
        &self,
        request: &ChatRequest
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let mut builder = LLMBuilder::new()
            .backend(self.backend.clone())
            .api_key(self.api_key.clone())
            .model(&self.model);

        if let Some(url) = self.base_url.clone() {
            builder = builder.base_url(url);
        }
        if let Some(system) = request.system.as_deref().filter(|s| !s.trim().is_empty()) {
            builder = builder.system(system);
        }

        let provider = builder.build()?;

        let messages: Vec<ChatMessage> = request.turns
            .iter()
            .map(|turn| ChatMessage {
                role: match turn.role {
                    Role::User => ChatRole::User,
                    Role::Assistant => ChatRole::Assistant,
                },
                content: turn.content.clone(),
                message_type: MessageType::Text,
            })
            .collect();
        debug!("{} chat: model={}, messages={}", self.llm_type, self.model, messages.len());

        let resp = provider.chat(&messages).await?;
        let text = text_or_error(resp.text().map(|s| s.to_string()), self.llm_type)?;
        Ok(CompletionResponse { response: text })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        self.base_url.clone()
    }
}
