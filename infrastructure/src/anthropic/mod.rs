//! Anthropic Messages API adapter
//!
//! Implements the [`LlmBackend`](council_application::LlmBackend) port over
//! HTTPS with `reqwest`. One call is one request: retry and cancellation are
//! handled by the application layer.

mod backend;
pub mod types;

pub use backend::{AnthropicBackend, AnthropicConfig};
