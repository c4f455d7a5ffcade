//! LocalApiAgent - REST implementation for an OpenAI-compatible local endpoint.
//!
//! This agent calls a local LM Studio-style chat-completions API.
//! Configuration priority: ~/.config/haven/config.toml > environment variables

use crate::agent::{AgentError, CompletionRequest, GenerativeAgent};
use async_trait::async_trait;
use haven_core::config::EngineConfig;
use reqwest::{header::HeaderValue, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Agent implementation that talks to a local OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct LocalApiAgent {
    client: Client,
    base_url: String,
    model: String,
}

impl LocalApiAgent {
    /// Creates a new agent for the given endpoint and model.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Builds an agent from engine configuration, honoring environment
    /// overrides.
    ///
    /// Priority:
    /// 1. Environment variables (`HAVEN_BASE_URL`, `HAVEN_MODEL_NAME`)
    /// 2. The loaded configuration values
    pub fn from_config(config: &EngineConfig) -> Self {
        let base_url = env::var("HAVEN_BASE_URL").unwrap_or_else(|_| config.base_url.clone());
        let model = env::var("HAVEN_MODEL_NAME").unwrap_or_else(|_| config.model.clone());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sends a tiny completion to verify the endpoint is reachable.
    pub async fn probe(&self) -> bool {
        let request = CompletionRequest {
            system_prompt: String::new(),
            user_prompt: "Test connection message".to_string(),
            temperature: 0.1,
            max_tokens: 10,
        };
        self.complete(request).await.is_ok()
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, AgentError> {
        let url = format!("{}{}", self.base_url, COMPLETIONS_PATH);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| AgentError::Process {
                status_code: None,
                message: format!("Completion request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
                retry_after: None,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Parse(format!("Failed to parse completion body: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl GenerativeAgent for LocalApiAgent {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AgentError> {
        let mut messages = Vec::with_capacity(2);
        if !request.system_prompt.trim().is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: request.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.user_prompt,
        });

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        self.send_request(&body).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, AgentError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AgentError::Parse("Endpoint returned no content in the response".into()))
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> AgentError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    AgentError::Process {
        status_code: Some(status.as_u16()),
        message,
        is_retryable,
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // Retry-After HTTP-date parsing is omitted for simplicity
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_normalized() {
        let agent = LocalApiAgent::new("http://127.0.0.1:1234/", "test-model");
        assert_eq!(agent.base_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_map_http_error_picks_api_message() {
        let body = r#"{"error": {"message": "model not loaded"}}"#;
        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, body.to_string(), None);
        match err {
            AgentError::Process {
                status_code,
                message,
                is_retryable,
                ..
            } => {
                assert_eq!(status_code, Some(503));
                assert_eq!(message, "model not loaded");
                assert!(is_retryable);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_falls_back_to_raw_body() {
        let err = map_http_error(StatusCode::BAD_REQUEST, "plain text".to_string(), None);
        match err {
            AgentError::Process {
                message,
                is_retryable,
                ..
            } => {
                assert_eq!(message, "plain text");
                assert!(!is_retryable);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let header = HeaderValue::from_static("120");
        assert_eq!(
            parse_retry_after(Some(&header)),
            Some(Duration::from_secs(120))
        );
        let date = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&date)), None);
    }

    #[test]
    fn test_extract_text_response_empty_choices() {
        let response = ChatCompletionResponse { choices: vec![] };
        assert!(extract_text_response(response).is_err());
    }
}
