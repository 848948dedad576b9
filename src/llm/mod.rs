//! Reqwest-based LLM client for OpenAI-compatible Chat Completions.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Everything the solution generator needs; built once and handed to the client.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl GeneratorConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            api_key: cfg.get("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: cfg.api_base_url(),
            model: cfg.get("DEFAULT_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()),
            max_tokens: cfg.get_u32("MAX_TOKENS").unwrap_or(1500),
            temperature: cfg.get_f32("TEMPERATURE").unwrap_or(0.2),
            request_timeout: cfg
                .get_secs("REQUEST_TIMEOUT")
                .unwrap_or(Duration::from_secs(60)),
        }
    }

    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to send chat request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("LLM error: {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
    #[error("malformed chat response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid API key header value")]
    InvalidApiKey,
    #[error("chat response contained no content")]
    Empty,
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(cfg: &GeneratorConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    /// Single non-streaming completion; returns the first choice's content, trimmed.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        opts: &ChatOptions,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let hv = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| GenerationError::InvalidApiKey)?;
            headers.insert(AUTHORIZATION, hv);
        }

        let body = serde_json::json!({
            "model": opts.model,
            "messages": messages,
            "max_tokens": opts.max_tokens,
            "temperature": opts.temperature,
        });

        let resp = self.http.post(url).headers(headers).json(&body).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Status { status, body: text });
        }

        let parsed: Completion = serde_json::from_str(&text)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(GenerationError::Empty)
    }
}

// Minimal response structures for OpenAI-like completions
#[derive(Debug, Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
