//! Path settings from TOML (`[storage]` and `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Expand a leading `~/` against the home directory
fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Overrides `~/.council/sessions`
    pub sessions_dir: Option<String>,
}

impl FileStorageConfig {
    pub fn sessions_dir(&self) -> Option<PathBuf> {
        self.sessions_dir.as_deref().map(expand_home)
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for per-session `.conversation.jsonl` transcripts
    pub transcript_dir: Option<String>,
}

impl FileLoggingConfig {
    pub fn transcript_dir(&self) -> Option<PathBuf> {
        self.transcript_dir.as_deref().map(expand_home)
    }
}
