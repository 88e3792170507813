//! LLM Client — the single point of entry for every chat-completion call.
//!
//! Speaks the OpenAI-compatible `/v1/chat/completions` protocol exposed by
//! LM Studio and similar local servers. The session loop only sees the
//! `ChatClient` trait, so tests can swap the transport out.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EndpointConfig;

pub mod message;

pub use message::{Conversation, Message, Role};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("could not reach the language model endpoint: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("endpoint returned status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("unexpected response format: {0}")]
    ResponseFormat(String),
}

/// Sends a whole conversation and returns the assistant's reply text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, conversation: &Conversation) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(config: &'a EndpointConfig, conversation: &'a Conversation) -> Self {
        Self {
            model: &config.model,
            messages: conversation.messages(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text of the first choice, the only one we ever ask for.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

/// HTTP-backed chat client. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
    config: EndpointConfig,
}

impl LlmClient {
    pub fn new(config: EndpointConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            config,
        })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }
}

#[async_trait]
impl ChatClient for LlmClient {
    async fn complete(&self, conversation: &Conversation) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest::new(&self.config, conversation);
        debug!(
            "Sending {} messages to {} (model: {})",
            conversation.len(),
            self.config.api_url,
            self.config.model
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("LLM endpoint returned {}: {}", status, body);
            return Err(LlmError::Server {
                status: status.as_u16(),
                body,
            });
        }

        parse_reply(&body)
    }
}

/// Decodes a chat-completion body into the reply text.
fn parse_reply(body: &str) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseFormat(e.to_string()))?;

    if let Some(usage) = &parsed.usage {
        debug!(
            "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    if parsed.choices.is_empty() {
        return Err(LlmError::ResponseFormat(
            "response contained no choices".to_string(),
        ));
    }

    parsed
        .text()
        .map(str::to_string)
        .ok_or_else(|| LlmError::ResponseFormat("first choice has no content".to_string()))
}
