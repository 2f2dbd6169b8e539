//! Deliberation phases

use serde::{Deserialize, Serialize};

/// A parallel phase of a deliberation.
///
/// The tally is not listed: it runs single-threaded after voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Every agent proposes a solution independently
    Generate,
    /// Every agent critiques the others' solutions
    Discuss { round: u32 },
    /// Every agent ranks the others' solutions
    Vote,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Generate => "generate",
            Phase::Discuss { .. } => "discuss",
            Phase::Vote => "vote",
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Phase::Generate => "Generating solutions".to_string(),
            Phase::Discuss { round } => format!("Discussion round {}", round),
            Phase::Vote => "Voting".to_string(),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
