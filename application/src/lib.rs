//! Application layer for council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{GatewayParams, RetryPolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{ApiFailure, CompletionRequest, GatewayError, LlmBackend},
    progress::{NoProgress, ProgressNotifier},
    session_store::{SessionEntry, SessionStore, StoreError},
};
pub use use_cases::model_gateway::ModelGateway;
pub use use_cases::participant::{Participant, ParticipantError};
pub use use_cases::run_deliberation::{PhaseCollector, RunDeliberationError, RunDeliberationUseCase};
