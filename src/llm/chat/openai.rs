use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION}};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::{ChatClient, ChatRequest, CompletionResponse, WireMessage};
use crate::llm::LlmConfig;

/// Client for OpenAI and any endpoint speaking the chat-completions protocol.
pub struct OpenAIChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let chat_model = model.unwrap_or_else(|| "gpt-4o".to_string());
        let api_url = base_url.unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| format!("Invalid API key format: {}", e))?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            model: chat_model,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| "OpenAI API key is required".to_string())?;

        Self::new(
            api_key,
            config.completion_model.clone(),
            config.base_url.clone(),
        )
    }
}

/// Text of the first choice. No choices or a null content is a provider error.
fn first_choice_content(body: &[u8]) -> Result<String, Box<dyn StdError + Send + Sync>> {
    let data: OpenAIChatResponse = serde_json::from_slice(body)?;
    let choice = data.choices
        .into_iter()
        .next()
        .ok_or_else(|| "OpenAI response contained no choices".to_string())?;
    let content = choice.message.content.ok_or_else(||
        "OpenAI response choice has no content".to_string()
    )?;
    Ok(content)
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn chat(
        &self,
        request: &ChatRequest
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let url = self.base_url.trim_end_matches('/').to_string();
        let req = OpenAIChatRequest {
            model: self.model.clone(),
            messages: request.to_wire_messages(),
            temperature: 0.7,
            max_tokens: Some(2048),
        };
        debug!("OpenAI chat: model={}, messages={}", req.model, req.messages.len());

        let resp = self.http.post(&url).json(&req).send().await?.error_for_status()?;
        let body = resp.bytes().await?;
        Ok(CompletionResponse { response: first_choice_content(&body)? })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
