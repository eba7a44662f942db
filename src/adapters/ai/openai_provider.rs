//! OpenAI Provider - Implementation of AIProvider for OpenAI's chat completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```
//!
//! Each `complete` call makes exactly one HTTP request. Retrying is left to
//! the client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Default model when a request names none.
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        OpenAIRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let openai_request = self.to_openai_request(request);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| super::map_transport_error(e, self.config.timeout))
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(Self::parse_retry_after(&error_body))),
            400 => {
                if error_body.contains("maximum context length")
                    || error_body.contains("context_length_exceeded")
                {
                    Err(AIError::context_too_long(0, 0))
                } else {
                    Err(AIError::InvalidRequest(error_body))
                }
            }
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses "try again in Xs" from a rate limit error body, defaulting to 30.
    fn parse_retry_after(error_body: &str) -> u32 {
        serde_json::from_str::<serde_json::Value>(error_body)
            .ok()
            .and_then(|parsed| {
                let msg = parsed.get("error")?.get("message")?.as_str()?.to_string();
                let idx = msg.find("try again in ")?;
                let digits: String = msg[idx + 13..]
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse::<u32>().ok()
            })
            .unwrap_or(30)
    }

    async fn parse_response(response: Response) -> Result<CompletionResponse, AIError> {
        let response = Self::handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };

        let usage = openai_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: openai_response.model,
            finish_reason,
        })
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(&request).await?;
        Self::parse_response(response).await
    }

    fn provider_info(&self) -> ProviderInfo {
        let max_context = match self.config.model.as_str() {
            m if m.starts_with("gpt-4o") || m.starts_with("gpt-4-turbo") => 128000,
            m if m.starts_with("gpt-4") => 8192,
            m if m.starts_with("gpt-3.5") => 16384,
            _ => 128000,
        };

        ProviderInfo::new("openai", &self.config.model, max_context)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::test_server::serve_once;
    use crate::domain::prompts::Flow;
    use crate::ports::RequestMetadata;
    use axum::http::StatusCode;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(Flow::Mcq, "trace-1"))
            .with_system_prompt("Answer in JSON")
            .with_message(MessageRole::User, "Which is prime?")
            .with_max_tokens(256)
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o-mini")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn request_model_overrides_default() {
        let provider = OpenAIProvider::new(OpenAIConfig::new("k").with_model("gpt-4o")).unwrap();

        let body = provider.to_openai_request(&request().with_model("gpt-4o-mini"));
        assert_eq!(body.model, "gpt-4o-mini");
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[1].content, "Which is prime?");

        let body = provider.to_openai_request(&request());
        assert_eq!(body.model, "gpt-4o");
    }

    #[test]
    fn provider_info_reports_context_window() {
        let provider = OpenAIProvider::new(OpenAIConfig::new("k").with_model("gpt-4")).unwrap();
        let info = provider.provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.max_context_tokens, 8192);
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit exceeded. Please try again in 12s."}}"#;
        assert_eq!(OpenAIProvider::parse_retry_after(error), 12);
        assert_eq!(OpenAIProvider::parse_retry_after("not json"), 30);
    }

    #[tokio::test]
    async fn completes_against_chat_endpoint() {
        let body = json!({
            "model": "gpt-4o",
            "choices": [{"message": {"role": "assistant", "content": "{\"a\":1}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 4}
        });
        let base = serve_once("/chat/completions", StatusCode::OK, body).await;
        let provider = OpenAIProvider::new(OpenAIConfig::new("k").with_base_url(base)).unwrap();

        let response = provider.complete(request()).await.unwrap();
        assert_eq!(response.content, "{\"a\":1}");
        assert_eq!(response.usage.total_tokens, 14);
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn maps_unauthorized_to_authentication_failed() {
        let base = serve_once(
            "/chat/completions",
            StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "bad key"}}),
        )
        .await;
        let provider = OpenAIProvider::new(OpenAIConfig::new("k").with_base_url(base)).unwrap();

        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, AIError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn maps_too_many_requests_to_rate_limited() {
        let base = serve_once(
            "/chat/completions",
            StatusCode::TOO_MANY_REQUESTS,
            json!({"error": {"message": "Please try again in 7s."}}),
        )
        .await;
        let provider = OpenAIProvider::new(OpenAIConfig::new("k").with_base_url(base)).unwrap();

        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 7 }));
    }

    #[tokio::test]
    async fn maps_server_errors_to_unavailable() {
        let base = serve_once(
            "/chat/completions",
            StatusCode::BAD_GATEWAY,
            json!({"error": {"message": "upstream"}}),
        )
        .await;
        let provider = OpenAIProvider::new(OpenAIConfig::new("k").with_base_url(base)).unwrap();

        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, AIError::Unavailable { .. }));
    }
}
