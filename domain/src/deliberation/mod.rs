//! Deliberation domain
//!
//! Entities and rules of a council run: agent identities, the phases, the
//! ballot format and the Borda tally that decides the outcome.

pub mod agent_id;
pub mod ballot;
pub mod config;
pub mod entities;
pub mod phase;
pub mod tally;

pub use agent_id::AgentId;
pub use ballot::{BallotError, BallotPayload, extract_json_payload, parse_ballot};
pub use config::DeliberationConfig;
pub use entities::{Critique, Deliberation, Solution, Vote};
pub use phase::Phase;
pub use tally::{BordaTally, TallyOutcome};
