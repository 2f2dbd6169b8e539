//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are configuration errors: they are raised before any remote call
/// is made and are always fatal for the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("minimum {minimum} agents required (got {requested})")]
    TooFewAgents { requested: u32, minimum: u32 },

    #[error("minimum 1 discussion round required (got {requested})")]
    NoRounds { requested: u32 },

    #[error("Task cannot be empty")]
    EmptyTask,

    #[error("Model identifier cannot be empty")]
    EmptyModel,
}
