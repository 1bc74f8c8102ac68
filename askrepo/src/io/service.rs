//! Reasoning-service abstraction for file selection and answer synthesis.
//!
//! The [`ReasoningService`] trait decouples the retrieval loop from the actual
//! language-model backend (an OpenAI-compatible chat-completions API). Tests
//! use scripted services that return predetermined replies without any
//! network traffic.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use crate::core::types::Conversation;
use crate::io::config::ServiceConfig;

/// Bytes of an error body kept in a [`ServiceError`].
const ERROR_BODY_LIMIT: usize = 2_000;

/// JSON Schema that constrains a structured reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    /// Schema name reported to the service.
    pub name: String,
    pub schema: Value,
}

/// Parameters for one reasoning-service call.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    /// System instruction followed by the ordered dialogue.
    pub conversation: Conversation,
    /// When `Some`, the reply must be JSON conforming to this schema.
    pub response_schema: Option<ResponseSchema>,
}

/// Abstraction over reasoning-service backends.
pub trait ReasoningService {
    /// Send the conversation and return the raw reply text.
    fn complete(&self, request: &ServiceRequest) -> Result<String>;
}

/// Failures talking to the reasoning service. Never recovered by the core.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("reasoning service rejected the credentials (HTTP {status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("reasoning service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("reasoning service request failed")]
    Transport(#[source] reqwest::Error),

    #[error("reasoning service reply is malformed: {0}")]
    MalformedResponse(String),
}

/// Service backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct HttpReasoningService {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpReasoningService {
    /// Build a client, reading the API key from `config.api_key_env`.
    ///
    /// A missing key is not an error here; the first call then fails with an
    /// authentication error from the service.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!(var = %config.api_key_env, "api key not set");
        }
        Self::new(config, api_key)
    }

    pub fn new(config: &ServiceConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }

    fn request_body(&self, request: &ServiceRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": request.conversation.messages(),
            "stream": false,
        });
        if let Some(schema) = &request.response_schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "strict": true,
                    "schema": schema.schema,
                },
            });
        }
        body
    }
}

impl ReasoningService for HttpReasoningService {
    #[instrument(skip_all, fields(messages = request.conversation.len(), structured = request.response_schema.is_some()))]
    fn complete(&self, request: &ServiceRequest) -> Result<String> {
        info!(endpoint = %self.endpoint, model = %self.model, "calling reasoning service");

        let mut http = self.client.post(&self.endpoint).json(&self.request_body(request));
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }
        let response = http.send().map_err(ServiceError::Transport)?;

        let status = response.status();
        let text = response.text().map_err(ServiceError::Transport)?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "reasoning service call failed");
            return Err(status_error(status.as_u16(), &text).into());
        }

        let content = parse_completion(&text)?;
        debug!(bytes = content.len(), "reasoning service replied");
        Ok(content)
    }
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Extract the first choice's message content from a completion body.
fn parse_completion(body: &str) -> Result<String, ServiceError> {
    let parsed: CompletionBody = serde_json::from_str(body)
        .map_err(|err| ServiceError::MalformedResponse(format!("parse completion: {err}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ServiceError::MalformedResponse("completion has no content".to_string()))
}

fn status_error(status: u16, body: &str) -> ServiceError {
    let body = truncate_body(body);
    match status {
        401 | 403 => ServiceError::Unauthorized { status, body },
        _ => ServiceError::Status { status, body },
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n[truncated {} bytes]", &body[..end], body.len() - end)
}
