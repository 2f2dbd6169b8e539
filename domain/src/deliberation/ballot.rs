//! Ballot parsing for the Vote phase.
//!
//! Models are asked for `{"rankings": [X, Y, ...], "reasoning": "..."}` but
//! routinely wrap it in prose or a markdown fence. Parsing happens in three
//! steps:
//!
//! | Step | Function | Failure |
//! |------|----------|---------|
//! | Locate the JSON object | [`extract_json_payload`] | [`BallotError::NoPayload`] |
//! | Decode the schema | [`BallotPayload`] via serde | [`BallotError::Malformed`] |
//! | Check every ranked id | [`parse_ballot`] | `SelfVote` / `OutOfRange` / `Duplicate` |
//!
//! Ranked ids are never corrected. A bad ballot is an error, and the caller
//! decides whether to re-prompt or degrade.

use super::agent_id::AgentId;
use super::entities::Vote;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

/// Why a vote response could not be turned into a [`Vote`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BallotError {
    #[error("no JSON object found in vote response")]
    NoPayload,

    #[error("malformed ballot: {0}")]
    Malformed(String),

    #[error("agent {voter} ranked its own solution")]
    SelfVote { voter: AgentId },

    #[error("ranked agent {value} is outside 1..={max}")]
    OutOfRange { value: u32, max: u32 },

    #[error("agent {value} ranked more than once")]
    Duplicate { value: u32 },
}

/// Wire shape of a ballot as the model writes it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BallotPayload {
    pub rankings: Vec<u32>,
    #[serde(default)]
    pub reasoning: String,
}

/// Find the JSON object inside a model response.
///
/// Uses the inner text of the first fenced block if there is one (a bare
/// fence or one tagged `json`), otherwise the whole text, and returns the
/// span from the first `{` to the last `}` inclusive.
///
/// ```
/// use council_domain::deliberation::ballot::extract_json_payload;
///
/// let text = "My ranking:\n```json\n{\"rankings\": [2, 3]}\n```\nDone.";
/// assert_eq!(extract_json_payload(text), Some("{\"rankings\": [2, 3]}"));
/// assert_eq!(extract_json_payload("no object here"), None);
/// ```
pub fn extract_json_payload(text: &str) -> Option<&str> {
    let body = fenced_block(text).unwrap_or(text);
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&body[start..=end])
}

/// Inner text of the first ``` fence, without its optional `json` tag
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let rest = &text[open + 3..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let close = rest.find("```")?;
    Some(&rest[..close])
}

/// Parse and validate one agent's vote response.
///
/// Each ranked id is checked in ballot order for self-vote, then range,
/// then duplication. The first offending id decides the error.
pub fn parse_ballot(response: &str, voter: AgentId, agent_count: u32) -> Result<Vote, BallotError> {
    let payload = extract_json_payload(response).ok_or(BallotError::NoPayload)?;
    let ballot: BallotPayload =
        serde_json::from_str(payload).map_err(|e| BallotError::Malformed(e.to_string()))?;

    let mut seen = HashSet::with_capacity(ballot.rankings.len());
    let mut rankings = Vec::with_capacity(ballot.rankings.len());
    for value in ballot.rankings {
        let id = AgentId::new(value);
        if id == voter {
            return Err(BallotError::SelfVote { voter });
        }
        if !id.is_within(agent_count) {
            return Err(BallotError::OutOfRange {
                value,
                max: agent_count,
            });
        }
        if !seen.insert(id) {
            return Err(BallotError::Duplicate { value });
        }
        rankings.push(id);
    }

    Ok(Vote::new(voter, rankings, ballot.reasoning))
}
