//! Raw TOML configuration data types
//!
//! These structs mirror the config file section by section. Every field has
//! a default, so a partial file (or none at all) deserializes cleanly.

mod api;
mod council;
mod output;
mod paths;
mod retry;

pub use api::FileApiConfig;
pub use council::FileCouncilConfig;
pub use output::FileOutputConfig;
pub use paths::{FileLoggingConfig, FileStorageConfig};
pub use retry::FileRetryConfig;

use council_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Council size, rounds and model
    pub council: FileCouncilConfig,
    /// Backend endpoint and request limits
    pub api: FileApiConfig,
    /// Backoff for rate-limited calls
    pub retry: FileRetryConfig,
    /// Session persistence
    pub storage: FileStorageConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Conversation transcripts
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors mirror what the deliberation itself would reject, so the binary
    /// can stop before the first remote call.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.council.validate();
        issues.extend(self.api.validate());
        issues
    }
}
