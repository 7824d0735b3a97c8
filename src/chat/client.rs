//! Core `ChatClient` trait and the `ApiChatClient` implementation.
//!
//! `ApiChatClient` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint — OpenAI, Ollama (OpenAI mode), Groq, LM Studio, vLLM, etc.
//! All connection details come from [`ChatConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ChatConfig;

// ---------------------------------------------------------------------------
// ChatError
// ---------------------------------------------------------------------------

/// Errors that can occur while asking the chat service for a completion.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP transport or connection error.
    #[error("chat request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("chat request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("chat service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse chat response: {0}")]
    Parse(String),

    /// The response carried no first choice, or its content was missing or null.
    #[error("chat service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ChatError::Timeout
        } else {
            ChatError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ChatClient trait
// ---------------------------------------------------------------------------

/// One-shot, stateless chat completion.
///
/// Every call is a fresh conversation holding a single user message; no
/// history is kept between calls.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError>;
}

// ---------------------------------------------------------------------------
// ApiChatClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// The `reqwest::Client` is built once and reused for every submission.
pub struct ApiChatClient {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ApiChatClient {
    /// Build an `ApiChatClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used if the
    /// builder fails.
    pub fn from_config(config: &ChatConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model":    self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "n":        1,
            "stream":   false
        });
        if let Some(t) = self.config.temperature {
            body["temperature"] = serde_json::json!(t);
        }
        if let Some(m) = self.config.max_tokens {
            body["max_tokens"] = serde_json::json!(m);
        }
        body
    }
}

#[async_trait]
impl ChatClient for ApiChatClient {
    /// Send `prompt` as the only user message and return the first choice.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is a non-empty string.
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let mut req = self.client.post(&url).json(&self.request_body(prompt));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        log::debug!("chat: POST {url} (model={})", self.config.model);
        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        first_choice_content(&json)
    }
}

/// Pull `choices[0].message.content` out of a chat-completions payload.
///
/// Only a missing or `null` content is an error; any string the model sent,
/// blank or not, is returned unchanged.
pub(crate) fn first_choice_content(json: &serde_json::Value) -> Result<String, ChatError> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(ChatError::EmptyResponse)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
