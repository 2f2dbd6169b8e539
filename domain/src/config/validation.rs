//! Configuration issues
//!
//! Loaded configuration is checked before any remote call. Checks return
//! structured issues instead of failing on the first problem so the binary
//! can print every warning and stop only on errors.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the run cannot start.
    Error,
    /// Non-fatal: the run starts but the value is probably a mistake.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Fewer agents than a council needs.
    TooFewAgents,
    /// Zero discussion rounds.
    NoRounds,
    /// Blank model identifier.
    EmptyModel,
    /// `max_tokens = 0` leaves no room for an answer.
    ZeroMaxTokens,
    /// `timeout_secs = 0` fails every request immediately.
    ZeroTimeout,
    /// More agents than the backend is likely to serve without throttling.
    LargeCouncil,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
