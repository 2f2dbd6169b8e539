//! Participant
//!
//! One agent of the council. A participant holds only its identity and the
//! shared gateway; every phase input arrives as a parameter.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::GatewayError;
use crate::use_cases::model_gateway::ModelGateway;
use council_domain::{
    AgentId, BallotError, Critique, DeliberationPrompt, Message, Phase, Solution, Vote,
    parse_ballot,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Errors raised by a single participant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParticipantError {
    #[error("agent {agent}: {source}")]
    Gateway { agent: AgentId, source: GatewayError },

    #[error("agent {agent}: {source}")]
    Ballot { agent: AgentId, source: BallotError },
}

impl ParticipantError {
    pub fn agent(&self) -> AgentId {
        match self {
            ParticipantError::Gateway { agent, .. } | ParticipantError::Ballot { agent, .. } => {
                *agent
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ParticipantError::Gateway { source, .. } if source.is_cancelled())
    }

    /// The underlying failure without the agent prefix
    pub fn cause(&self) -> String {
        match self {
            ParticipantError::Gateway { source, .. } => source.to_string(),
            ParticipantError::Ballot { source, .. } => source.to_string(),
        }
    }
}

/// One agent identity around the shared gateway
pub struct Participant {
    id: AgentId,
    total: u32,
    gateway: Arc<ModelGateway>,
    logger: Arc<dyn ConversationLogger>,
}

impl Participant {
    pub fn new(id: AgentId, total: u32, gateway: Arc<ModelGateway>) -> Self {
        Self {
            id,
            total,
            gateway,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Solve the task independently
    pub async fn generate_solution(
        &self,
        task: &str,
        cancel: &CancellationToken,
    ) -> Result<Solution, ParticipantError> {
        let system = DeliberationPrompt::generation_system(self.id, self.total);
        let content = self
            .exchange(&Phase::Generate, &system, task.to_string(), cancel)
            .await?;
        Ok(Solution::new(self.id, content))
    }

    /// Critique every other solution for one discussion round
    pub async fn critique(
        &self,
        task: &str,
        solutions: &[Solution],
        round: u32,
        cancel: &CancellationToken,
    ) -> Result<Critique, ParticipantError> {
        let system = DeliberationPrompt::discussion_system(self.id, self.total);
        let request = DeliberationPrompt::discussion_request(task, solutions);
        let content = self
            .exchange(&Phase::Discuss { round }, &system, request, cancel)
            .await?;
        Ok(Critique::new(self.id, round, content))
    }

    /// Rank every solution except this agent's own
    ///
    /// A single attempt: the caller owns the re-prompt and degrade policy.
    pub async fn vote(
        &self,
        task: &str,
        solutions: &[Solution],
        critiques: &[Critique],
        cancel: &CancellationToken,
    ) -> Result<Vote, ParticipantError> {
        let system = DeliberationPrompt::voting_system(self.id, self.total);
        let request = DeliberationPrompt::voting_request(self.id, task, solutions, critiques);
        let response = self.exchange(&Phase::Vote, &system, request, cancel).await?;

        parse_ballot(&response, self.id, self.total).map_err(|source| {
            debug!("Agent {} returned an invalid ballot: {}", self.id, source);
            ParticipantError::Ballot {
                agent: self.id,
                source,
            }
        })
    }

    async fn exchange(
        &self,
        phase: &Phase,
        system: &str,
        request: String,
        cancel: &CancellationToken,
    ) -> Result<String, ParticipantError> {
        self.logger.log(ConversationEvent::new(
            "llm_request",
            json!({
                "agent": self.id,
                "phase": phase,
                "system": system,
                "prompt": request,
            }),
        ));

        let result = self
            .gateway
            .send(system, &[Message::user(request)], cancel)
            .await;

        match result {
            Ok(text) => {
                self.logger.log(ConversationEvent::new(
                    "llm_response",
                    json!({
                        "agent": self.id,
                        "phase": phase,
                        "bytes": text.len(),
                        "text": text,
                    }),
                ));
                Ok(text)
            }
            Err(source) => {
                self.logger.log(ConversationEvent::new(
                    "llm_response",
                    json!({
                        "agent": self.id,
                        "phase": phase,
                        "error": source.to_string(),
                    }),
                ));
                Err(ParticipantError::Gateway {
                    agent: self.id,
                    source,
                })
            }
        }
    }
}
