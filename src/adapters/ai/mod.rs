//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat completions
//! - `AnthropicProvider` - Anthropic Messages API

mod anthropic_provider;
mod mock_provider;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AiConfig, AiProvider};
use crate::ports::{AIError, AIProvider};

/// Builds the configured provider.
pub fn provider_from_config(config: &AiConfig) -> Result<Arc<dyn AIProvider>, AIError> {
    let api_key = config.api_key().ok_or(AIError::AuthenticationFailed)?;

    let provider: Arc<dyn AIProvider> = match config.provider {
        AiProvider::OpenAI => {
            let mut openai = OpenAIConfig::new(api_key)
                .with_base_url(&config.openai_base_url)
                .with_timeout(config.timeout());
            if let Some(model) = &config.model {
                openai = openai.with_model(model);
            }
            Arc::new(OpenAIProvider::new(openai)?)
        }
        AiProvider::Anthropic => {
            let mut anthropic = AnthropicConfig::new(api_key)
                .with_base_url(&config.anthropic_base_url)
                .with_timeout(config.timeout());
            if let Some(model) = &config.model {
                anthropic = anthropic.with_model(model);
            }
            Arc::new(AnthropicProvider::new(anthropic)?)
        }
    };

    Ok(provider)
}

/// Maps a reqwest transport failure to the port's error taxonomy.
fn map_transport_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("Connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// One-shot local HTTP server standing in for a provider API.
#[cfg(test)]
pub(crate) mod test_server {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    /// Serves `body` with `status` on `path`, returning the base URL.
    pub async fn serve_once(path: &str, status: StatusCode, body: Value) -> String {
        let app = Router::new().route(
            path,
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
