//! Deliberation entities
//!
//! - [`Solution`] - one agent's answer from the Generate phase
//! - [`Critique`] - one agent's review of its peers in a discussion round
//! - [`Vote`] - one agent's ranked ballot
//! - [`Deliberation`] - the record accumulated across all phases

use super::agent_id::AgentId;
use super::config::DeliberationConfig;
use super::tally::TallyOutcome;
use crate::core::model::Model;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An agent's proposed solution to the task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub agent_id: AgentId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Solution {
    pub fn new(agent_id: AgentId, content: impl Into<String>) -> Self {
        Self {
            agent_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// An agent's critique of every other solution in one discussion round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critique {
    pub agent_id: AgentId,
    pub round: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Critique {
    pub fn new(agent_id: AgentId, round: u32, content: impl Into<String>) -> Self {
        Self {
            agent_id,
            round,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// A ranked-choice ballot
///
/// `rankings` is best-first, never contains `voter_id`, and holds unique ids
/// in `[1, agent_count]`. Ballot parsing enforces this before a `Vote` is
/// constructed from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: AgentId,
    pub rankings: Vec<AgentId>,
    pub reasoning: String,
}

impl Vote {
    /// Reasoning recorded for a ballot that could not be recovered
    pub const FAILED_REASONING: &'static str = "vote failed to parse";

    pub fn new(voter_id: AgentId, rankings: Vec<AgentId>, reasoning: impl Into<String>) -> Self {
        Self {
            voter_id,
            rankings,
            reasoning: reasoning.into(),
        }
    }

    /// Empty ballot recorded after the retry also failed
    pub fn failed(voter_id: AgentId) -> Self {
        Self::new(voter_id, Vec::new(), Self::FAILED_REASONING)
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }
}

/// Complete record of one deliberation (Entity)
///
/// Created empty when the run starts, filled phase by phase by the
/// orchestrator, and frozen once [`complete`](Self::complete) stamps
/// `completed_at`. Field names are the persisted format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliberation {
    pub id: String,
    pub task: String,
    pub agent_count: u32,
    pub rounds: u32,
    pub model: Model,
    pub solutions: Vec<Solution>,
    pub critiques: Vec<Critique>,
    pub votes: Vec<Vote>,
    pub scores: BTreeMap<AgentId, u32>,
    pub winner_id: Option<AgentId>,
    pub is_tie: bool,
    pub tied_agents: Vec<AgentId>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Deliberation {
    pub fn new(config: &DeliberationConfig) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task: config.task.clone(),
            agent_count: config.agent_count,
            rounds: config.rounds,
            model: config.model.clone(),
            solutions: Vec::new(),
            critiques: Vec::new(),
            votes: Vec::new(),
            scores: BTreeMap::new(),
            winner_id: None,
            is_tie: false,
            tied_agents: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// First six characters of the id, used in filenames and listings
    pub fn short_id(&self) -> &str {
        self.id.get(..6).unwrap_or(&self.id)
    }

    /// Merge the solutions of a finished Generate phase
    pub fn record_solutions(&mut self, solutions: impl IntoIterator<Item = Solution>) {
        self.solutions.extend(solutions);
        self.solutions.sort_by_key(|s| s.agent_id);
    }

    /// Merge the critiques of a finished discussion round
    pub fn record_critiques(&mut self, critiques: impl IntoIterator<Item = Critique>) {
        self.critiques.extend(critiques);
        self.critiques.sort_by_key(|c| (c.round, c.agent_id));
    }

    /// Merge the ballots of a finished Vote phase
    pub fn record_votes(&mut self, votes: impl IntoIterator<Item = Vote>) {
        self.votes.extend(votes);
        self.votes.sort_by_key(|v| v.voter_id);
    }

    pub fn apply_tally(&mut self, outcome: TallyOutcome) {
        self.scores = outcome.scores;
        self.winner_id = outcome.winner_id;
        self.is_tie = outcome.is_tie;
        self.tied_agents = outcome.tied_agents;
    }

    /// Stamp the completion time; the record is final afterwards
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn solution_by(&self, agent_id: AgentId) -> Option<&Solution> {
        self.solutions.iter().find(|s| s.agent_id == agent_id)
    }

    pub fn winning_solution(&self) -> Option<&Solution> {
        self.winner_id.and_then(|id| self.solution_by(id))
    }

    /// Solutions of every agent sharing the top score, ascending
    pub fn tied_solutions(&self) -> impl Iterator<Item = &Solution> {
        self.solutions
            .iter()
            .filter(|s| self.tied_agents.contains(&s.agent_id))
    }

    pub fn critiques_in_round(&self, round: u32) -> impl Iterator<Item = &Critique> {
        self.critiques.iter().filter(move |c| c.round == round)
    }
}
