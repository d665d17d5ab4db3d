//! Reasoning-service clients: an OpenAI-compatible HTTP client and a
//! deterministic stub for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReasoningError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("response contained no choices")]
    EmptyResponse,
    #[error("{0}")]
    Unavailable(String),
}

/// A service that assesses a structured prompt and returns free text
/// expected to contain a JSON verdict.
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    async fn assess(&self, system: &str, user: &str) -> Result<String, ReasoningError>;
}

/// Connection settings for [`HttpReasoningClient`].
#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    /// Like `http://localhost:8080` (no trailing slash).
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl ReasoningConfig {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url,
            model,
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

/// OpenAI-compatible chat-completions client.
pub struct HttpReasoningClient {
    client: reqwest::Client,
    config: ReasoningConfig,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl HttpReasoningClient {
    pub fn new(config: ReasoningConfig) -> Result<Self, ReasoningError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            config: ReasoningConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }
}

#[async_trait]
impl ReasoningClient for HttpReasoningClient {
    async fn assess(&self, system: &str, user: &str) -> Result<String, ReasoningError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.0,
        };

        let mut req = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ReasoningError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ReasoningError::EmptyResponse)?;
        info!(model = %self.config.model, chars = content.len(), "reasoning service answered");
        Ok(content)
    }
}

/// Scripted client for tests and offline runs: pops one canned outcome per
/// call, repeating the final entry once the script is exhausted.
pub struct StubReasoningClient {
    script: Mutex<VecDeque<Result<String, String>>>,
    last: Result<String, String>,
}

impl StubReasoningClient {
    /// Always answer with the same text.
    pub fn replying(text: &str) -> Self {
        Self::with_script(vec![Ok(text.to_string())])
    }

    /// Always fail with the same message.
    pub fn failing(message: &str) -> Self {
        Self::with_script(vec![Err(message.to_string())])
    }

    /// Answer each call with the next scripted outcome.
    pub fn with_script(script: Vec<Result<String, String>>) -> Self {
        let last = script
            .last()
            .cloned()
            .unwrap_or_else(|| Err("empty stub script".to_string()));
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last,
        }
    }
}

#[async_trait]
impl ReasoningClient for StubReasoningClient {
    async fn assess(&self, _system: &str, _user: &str) -> Result<String, ReasoningError> {
        let next = {
            let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
            script.pop_front().unwrap_or_else(|| self.last.clone())
        };
        next.map_err(ReasoningError::Unavailable)
    }
}
