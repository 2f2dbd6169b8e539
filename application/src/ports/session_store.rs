//! Session store port
//!
//! Defines how finished (or aborted) deliberations are persisted and found
//! again by `council view`.

use chrono::{DateTime, Utc};
use council_domain::{AgentId, Deliberation};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while saving or loading sessions
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid session file {path}: {source}")]
    Serialization {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Could not determine home directory")]
    NoHomeDirectory,
}

/// Summary of one saved session, used for listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub path: PathBuf,
    pub id: String,
    pub task: String,
    pub agent_count: u32,
    pub rounds: u32,
    pub winner_id: Option<AgentId>,
    pub is_tie: bool,
    pub tied_agents: Vec<AgentId>,
    pub created_at: DateTime<Utc>,
}

impl SessionEntry {
    pub fn from_deliberation(path: PathBuf, deliberation: &Deliberation) -> Self {
        Self {
            path,
            id: deliberation.id.clone(),
            task: deliberation.task.clone(),
            agent_count: deliberation.agent_count,
            rounds: deliberation.rounds,
            winner_id: deliberation.winner_id,
            is_tie: deliberation.is_tie,
            tied_agents: deliberation.tied_agents.clone(),
            created_at: deliberation.created_at,
        }
    }
}

/// Persistent storage of deliberation records
pub trait SessionStore: Send + Sync {
    /// Save into the store's directory under the canonical filename
    fn save(&self, deliberation: &Deliberation) -> Result<PathBuf, StoreError>;

    /// Save to an explicit path
    fn save_to(&self, deliberation: &Deliberation, path: &Path) -> Result<(), StoreError>;

    fn load(&self, path: &Path) -> Result<Deliberation, StoreError>;

    /// Every readable session, newest first
    fn list(&self) -> Result<Vec<SessionEntry>, StoreError>;

    /// Turn a user-supplied session reference into a file path
    ///
    /// A reference ending in `.json` is a path; anything else matches the
    /// first saved filename containing it.
    fn resolve(&self, reference: &str) -> Result<PathBuf, StoreError>;
}
