//! Domain layer for council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Deliberation
//!
//! A council of N agents (N >= 3) works one task through a fixed protocol:
//!
//! - **Generate**: every agent solves the task independently
//! - **Discuss**: every agent critiques the other solutions, for R rounds
//! - **Vote**: every agent ranks all solutions except its own
//! - **Tally**: a Borda count picks a winner or reports a tie
//!
//! ## Ballots
//!
//! Votes arrive as free-form model text. [`parse_ballot`] extracts the JSON
//! object and rejects self-votes, unknown agents and duplicates.

pub mod config;
pub mod core;
pub mod deliberation;
pub mod prompt;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::DomainError,
    message::{Message, Role},
    model::Model,
};
pub use deliberation::{
    AgentId, BallotError, BallotPayload, BordaTally, Critique, Deliberation, DeliberationConfig,
    Phase, Solution, TallyOutcome, Vote, extract_json_payload, parse_ballot,
};
pub use prompt::DeliberationPrompt;
