use async_trait::async_trait;
use log::info;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::engine::AnswerEngine;
use crate::llm::LlmConfig;
use crate::llm::chat::{ ChatClient, ChatRequest, new_client as new_chat_client };
use crate::models::chat::Turn;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer the user's latest question using the conversation so far. \
If you do not know the answer, say so instead of guessing.";

/// Answer engine backed by a single chat-completion model.
pub struct LlmAnswerEngine {
    chat_client: Arc<dyn ChatClient>,
    system_prompt: Option<String>,
}

impl LlmAnswerEngine {
    pub fn new(chat_client: Arc<dyn ChatClient>, system_prompt: Option<String>) -> Self {
        Self { chat_client, system_prompt }
    }

    pub fn from_config(
        config: &LlmConfig,
        system_prompt: Option<String>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let chat_client = new_chat_client(config)?;
        info!(
            "Chat client configured: Type={}, Model={}, BaseURL={}",
            config.llm_type,
            chat_client.get_model(),
            chat_client.get_base_url().as_deref().unwrap_or("adapter default")
        );
        Ok(Self::new(chat_client, system_prompt))
    }
}

#[async_trait]
impl AnswerEngine for LlmAnswerEngine {
    async fn answer(
        &self,
        query: &str,
        history: &[Turn]
    ) -> Result<String, Box<dyn StdError + Send + Sync>> {
        let request = ChatRequest::new(self.system_prompt.clone(), history, query);
        let resp = self.chat_client.chat(&request).await?;
        Ok(resp.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::CompletionResponse;
    use crate::models::chat::Role;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatClient for RecordingClient {
        async fn chat(
            &self,
            request: &ChatRequest
        ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(CompletionResponse { response: "It's sunny.".into() })
        }

        fn get_model(&self) -> String {
            "stub".into()
        }

        fn get_base_url(&self) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn sends_history_then_query_with_system_prompt() {
        let client = Arc::new(RecordingClient::default());
        let engine = LlmAnswerEngine::new(client.clone(), Some(DEFAULT_SYSTEM_PROMPT.into()));
        let history = vec![
            Turn::new(Role::User, "hi"),
            Turn::new(Role::Assistant, "hello, how can I help?"),
        ];

        let answer = engine.answer("what's the weather?", &history).await.unwrap();
        assert_eq!(answer, "It's sunny.");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system.as_deref(), Some(DEFAULT_SYSTEM_PROMPT));
        assert_eq!(seen[0].turns.len(), 3);
        assert_eq!(seen[0].turns[2], Turn::new(Role::User, "what's the weather?"));
    }
}
