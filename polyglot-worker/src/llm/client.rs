//! OpenAI-compatible chat-completions client
//!
//! Each operation is a single blocking request/response round trip with a
//! long timeout; model responses for full-article translation can take many
//! minutes. Failures are never retried here, they propagate to the caller
//! and are redriven at the queue level.

use crate::llm::prompts;
use polyglot_common::config::LlmConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TEMPERATURE: f32 = 0.5;

/// Language model client errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Model returned empty response")]
    EmptyCompletion,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// The two completion operations the pipeline needs.
///
/// The orchestrator is generic over this trait so tests can substitute a
/// scripted backend for the remote API.
pub trait CompletionBackend {
    fn summarize(
        &self,
        text: &str,
        max_length: u32,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;

    fn translate(
        &self,
        text: &str,
        from_language: &str,
        to_language: &str,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Remote chat-completions client
pub struct LlmClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
            api_key: config.api_key,
            model: config.model,
        })
    }

    /// Submit one system+user turn and return the completion text.
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(status.as_u16(), body));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }
}

impl CompletionBackend for LlmClient {
    /// Summarize `text` to at most `max_length` characters.
    async fn summarize(&self, text: &str, max_length: u32) -> Result<String, LlmError> {
        tracing::debug!(max_length, "Requesting summary completion");
        self.complete(&prompts::summary_prompt(max_length), text)
            .await
    }

    /// Translate `text` from one language to another, format preserved.
    async fn translate(
        &self,
        text: &str,
        from_language: &str,
        to_language: &str,
    ) -> Result<String, LlmError> {
        tracing::debug!(from_language, to_language, "Requesting translation completion");
        self.complete(
            &prompts::translation_prompt(from_language, to_language),
            text,
        )
        .await
    }
}
