//! Wire types for the Messages API
//!
//! Request: `{model, max_tokens, system?, messages: [{role, content}]}`.
//! Success: `{content: [{type, text?}, ...], ...}`.
//! Failure: `{type: "error", error: {type, message}}`.

use council_application::{ApiFailure, CompletionRequest};
use council_domain::Message;
use serde::{Deserialize, Serialize};

/// Longest raw body echoed into an error message
const MAX_ERROR_BODY: usize = 512;

/// Request body for `POST /v1/messages`
#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub system: &'a str,
    pub messages: &'a [Message],
}

impl<'a> From<&'a CompletionRequest> for MessagesRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: request.model.as_str(),
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: &request.messages,
        }
    }
}

/// One content segment of a reply
#[derive(Debug, Clone, Deserialize)]
pub struct ContentSegment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Success body; fields other than `content` are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentSegment>,
}

impl MessagesResponse {
    /// First `text` segment, or an empty string when there is none
    pub fn first_text(&self) -> &str {
        self.content
            .iter()
            .find(|segment| segment.kind == "text")
            .and_then(|segment| segment.text.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Describe a non-2xx response
///
/// Uses the provider's error envelope when the body has one, otherwise the
/// (truncated) raw body.
pub fn api_failure(status: u16, body: &str) -> ApiFailure {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ApiFailure::new(status, envelope.error.kind, envelope.error.message),
        Err(_) => {
            let raw: String = body.chars().take(MAX_ERROR_BODY).collect();
            ApiFailure::new(status, "http_error", raw.trim())
        }
    }
}
