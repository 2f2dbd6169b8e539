//! LLM backend port
//!
//! Defines the interface for sending one completion request to a model
//! provider. Retry and cancellation live above this port in
//! [`ModelGateway`](crate::use_cases::model_gateway::ModelGateway); a backend
//! makes exactly one attempt per call.

use async_trait::async_trait;
use council_domain::{Message, Model};
use thiserror::Error;

/// Failure details reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    /// HTTP status code
    pub status: u16,
    /// Provider error kind (e.g. `rate_limit_error`)
    pub kind: String,
    pub message: String,
}

impl ApiFailure {
    pub fn new(status: u16, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} {}: {}", self.status, self.kind, self.message)
    }
}

/// Errors that can occur during backend calls
///
/// The variant is the outcome tag: retry decisions dispatch on
/// [`is_rate_limited`](Self::is_rate_limited), never on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Rate limited ({0})")]
    RateLimited(ApiFailure),

    #[error("Authentication failed ({0})")]
    Authentication(ApiFailure),

    #[error("Invalid request ({0})")]
    InvalidRequest(ApiFailure),

    #[error("Server error ({0})")]
    ServerError(ApiFailure),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        source: Box<GatewayError>,
    },

    #[error("Request cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Classify a provider failure by HTTP status
    pub fn from_api(failure: ApiFailure) -> Self {
        match failure.status {
            429 => GatewayError::RateLimited(failure),
            401 | 403 => GatewayError::Authentication(failure),
            500..=599 => GatewayError::ServerError(failure),
            _ => GatewayError::InvalidRequest(failure),
        }
    }

    /// Whether the request may succeed after waiting
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GatewayError::Cancelled)
    }
}

/// One request to the model backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: Model,
    pub max_tokens: u32,
    /// System instruction, sent separately from the turns
    pub system: String,
    pub messages: Vec<Message>,
}

/// Backend for model completions
///
/// This port defines how the application layer talks to a model provider.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Send one request and return the first text segment of the reply
    ///
    /// Returns an empty string when the reply has no text segment.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}
