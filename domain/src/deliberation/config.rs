//! Deliberation configuration (Value Object)

use crate::core::error::DomainError;
use crate::core::model::Model;

/// Parameters of a single deliberation.
///
/// Built by the command surface and validated before the gateway is
/// constructed, so an invalid council never makes a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliberationConfig {
    /// The task every agent solves
    pub task: String,
    /// Number of participating agents
    pub agent_count: u32,
    /// Number of discussion rounds
    pub rounds: u32,
    /// Model shared by every agent
    pub model: Model,
}

impl DeliberationConfig {
    /// Smallest council where every voter still has two candidates to rank
    pub const MIN_AGENTS: u32 = 3;
    pub const MIN_ROUNDS: u32 = 1;

    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            agent_count: Self::MIN_AGENTS,
            rounds: Self::MIN_ROUNDS,
            model: Model::default(),
        }
    }

    pub fn with_agents(mut self, agent_count: u32) -> Self {
        self.agent_count = agent_count;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.agent_count < Self::MIN_AGENTS {
            return Err(DomainError::TooFewAgents {
                requested: self.agent_count,
                minimum: Self::MIN_AGENTS,
            });
        }
        if self.rounds < Self::MIN_ROUNDS {
            return Err(DomainError::NoRounds {
                requested: self.rounds,
            });
        }
        if self.task.trim().is_empty() {
            return Err(DomainError::EmptyTask);
        }
        if self.model.as_str().trim().is_empty() {
            return Err(DomainError::EmptyModel);
        }
        Ok(())
    }
}
