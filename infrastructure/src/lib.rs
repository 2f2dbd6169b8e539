//! Infrastructure layer for council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Anthropic HTTP backend, JSON session
//! storage, JSONL transcripts, and configuration file loading.

pub mod anthropic;
pub mod config;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use anthropic::{AnthropicBackend, AnthropicConfig};
pub use config::{
    ConfigLoader, FileApiConfig, FileConfig, FileCouncilConfig, FileLoggingConfig,
    FileOutputConfig, FileRetryConfig, FileStorageConfig,
};
pub use logging::JsonlConversationLogger;
pub use storage::JsonSessionStore;
