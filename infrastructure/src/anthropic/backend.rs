//! HTTP backend for the Anthropic Messages API

use super::types::{MessagesRequest, MessagesResponse, api_failure};
use async_trait::async_trait;
use council_application::{CompletionRequest, GatewayError, LlmBackend};
use std::time::Duration;
use tracing::debug;

/// Connection settings for [`AnthropicBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl AnthropicConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
    /// The only place the API key is read from
    pub const API_KEY_ENV: &'static str = "ANTHROPIC_API_KEY";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Read the API key from `ANTHROPIC_API_KEY`; `None` when unset or blank
    pub fn from_env() -> Option<Self> {
        std::env::var(Self::API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`LlmBackend`] over the Anthropic Messages API
pub struct AnthropicBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AnthropicBackend {
    pub const API_VERSION: &'static str = "2023-06-01";

    pub fn new(config: AnthropicConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: Self::endpoint(&config.base_url),
            api_key: config.api_key,
        })
    }

    /// `{base_url}/v1/messages`, tolerating a trailing slash on the base
    pub fn endpoint(base_url: &str) -> String {
        format!("{}/v1/messages", base_url.trim_end_matches('/'))
    }
}

fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(error.to_string())
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let body = MessagesRequest::from(request);
        debug!(
            "POST {} (model {}, {} messages)",
            self.endpoint,
            body.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(GatewayError::from_api(api_failure(status.as_u16(), &text)));
        }

        let parsed: MessagesResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(parsed.first_text().to_string())
    }
}
