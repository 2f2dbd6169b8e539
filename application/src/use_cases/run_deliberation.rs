//! Run Deliberation use case
//!
//! Orchestrates the full council protocol:
//!
//! ```text
//! Generate ──▶ Discuss (round 1..=R) ──▶ Vote ──▶ Tally
//! ```
//!
//! Every phase fans out one task per participant on a [`JoinSet`] and joins
//! all of them before the next phase starts. Tasks read an immutable
//! snapshot of the previous phases and append their output to a
//! [`PhaseCollector`]; the orchestrator merges the collector into the
//! [`Deliberation`] once the phase has joined.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::model_gateway::ModelGateway;
use crate::use_cases::participant::{Participant, ParticipantError};
use council_domain::{
    AgentId, BordaTally, Critique, Deliberation, DeliberationConfig, DomainError, Phase, Solution,
    Vote,
};
use serde_json::json;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that can occur during a deliberation
#[derive(Error, Debug)]
pub enum RunDeliberationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] DomainError),

    #[error("{phase} failed: {}", format_failures(.failures))]
    PhaseFailed {
        phase: Phase,
        /// Every failing agent, ascending, with its cause
        failures: Vec<(AgentId, String)>,
    },

    #[error("deliberation cancelled")]
    Cancelled,
}

impl RunDeliberationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunDeliberationError::Cancelled)
    }
}

fn format_failures(failures: &[(AgentId, String)]) -> String {
    failures
        .iter()
        .map(|(agent, cause)| format!("agent {}: {}", agent, cause))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Shared write path for one phase
///
/// Participant tasks append under the lock, one lock per append. The
/// orchestrator drains it after the phase has joined.
pub struct PhaseCollector<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> PhaseCollector<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, item: T) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item);
    }

    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every collected item, leaving the collector empty
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *self.items.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<T> Clone for PhaseCollector<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for PhaseCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A ballot as it enters the record, plus why it was degraded if it was
struct BallotOutcome {
    vote: Vote,
    degraded: Option<String>,
}

/// Output of one participant task
///
/// A task can finish without error and still count as unsuccessful for
/// progress reporting, as a degraded ballot does.
trait PhaseOutput {
    fn succeeded(&self) -> bool {
        true
    }
}

impl PhaseOutput for Solution {}

impl PhaseOutput for Critique {}

impl PhaseOutput for BallotOutcome {
    fn succeeded(&self) -> bool {
        self.degraded.is_none()
    }
}

/// Use case for running a deliberation
pub struct RunDeliberationUseCase {
    gateway: Arc<ModelGateway>,
    logger: Arc<dyn ConversationLogger>,
}

impl RunDeliberationUseCase {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        config: &DeliberationConfig,
        cancel: &CancellationToken,
    ) -> Result<Deliberation, RunDeliberationError> {
        self.execute_with_progress(config, &NoProgress, cancel).await
    }

    /// Validate the configuration, then run a fresh deliberation
    pub async fn execute_with_progress(
        &self,
        config: &DeliberationConfig,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<Deliberation, RunDeliberationError> {
        config.validate()?;
        let mut deliberation = Deliberation::new(config);
        self.run(&mut deliberation, progress, cancel).await?;
        Ok(deliberation)
    }

    /// Drive every phase on an existing record
    ///
    /// On error the record keeps every phase merged so far, so callers can
    /// persist the partial result.
    pub async fn run(
        &self,
        deliberation: &mut Deliberation,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<(), RunDeliberationError> {
        let agent_count = deliberation.agent_count;
        let participants: Vec<Arc<Participant>> = AgentId::all(agent_count)
            .map(|id| {
                Arc::new(
                    Participant::new(id, agent_count, Arc::clone(&self.gateway))
                        .with_logger(Arc::clone(&self.logger)),
                )
            })
            .collect();
        let task: Arc<str> = Arc::from(deliberation.task.as_str());

        info!(
            "Starting deliberation {} with {} agents and {} discussion rounds",
            deliberation.short_id(),
            agent_count,
            deliberation.rounds
        );

        // Phase 1: Generate
        let solutions = self
            .fan_out(Phase::Generate, &participants, progress, cancel, |participant| {
                let task = Arc::clone(&task);
                let cancel = cancel.clone();
                async move { participant.generate_solution(&task, &cancel).await }
            })
            .await?;
        deliberation.record_solutions(solutions);
        for solution in &deliberation.solutions {
            progress.on_solution(solution);
        }
        self.log_phase_complete(&Phase::Generate, deliberation.solutions.len());

        let solutions: Arc<[Solution]> = deliberation.solutions.clone().into();

        // Phase 2: Discuss
        for round in 1..=deliberation.rounds {
            let phase = Phase::Discuss { round };
            let critiques = self
                .fan_out(phase, &participants, progress, cancel, |participant| {
                    let task = Arc::clone(&task);
                    let solutions = Arc::clone(&solutions);
                    let cancel = cancel.clone();
                    async move {
                        participant
                            .critique(&task, &solutions, round, &cancel)
                            .await
                    }
                })
                .await?;
            let merged = critiques.len();
            deliberation.record_critiques(critiques);
            for critique in deliberation.critiques_in_round(round) {
                progress.on_critique(critique);
            }
            self.log_phase_complete(&phase, merged);
        }

        let critiques: Arc<[Critique]> = deliberation.critiques.clone().into();

        // Phase 3: Vote
        let ballots = self
            .fan_out(Phase::Vote, &participants, progress, cancel, |participant| {
                let task = Arc::clone(&task);
                let solutions = Arc::clone(&solutions);
                let critiques = Arc::clone(&critiques);
                let cancel = cancel.clone();
                let logger = Arc::clone(&self.logger);
                async move {
                    cast_ballot(&participant, &task, &solutions, &critiques, &cancel, logger.as_ref())
                        .await
                }
            })
            .await?;

        let mut degraded = Vec::new();
        deliberation.record_votes(ballots.into_iter().map(|ballot| {
            if let Some(reason) = ballot.degraded {
                degraded.push((ballot.vote.voter_id, reason));
            }
            ballot.vote
        }));
        degraded.sort();
        for (agent, reason) in &degraded {
            progress.on_vote_degraded(*agent, reason);
        }
        for vote in &deliberation.votes {
            progress.on_vote(vote);
        }
        self.log_phase_complete(&Phase::Vote, deliberation.votes.len());

        // Phase 4: Tally
        let outcome = BordaTally::compute(agent_count, &deliberation.votes);
        deliberation.apply_tally(outcome);
        deliberation.complete();

        match deliberation.winner_id {
            Some(winner) => info!("Agent {} wins the deliberation", winner),
            None => info!(
                "Deliberation tied between agents {:?}",
                deliberation.tied_agents
            ),
        }

        Ok(())
    }

    /// Run one phase on every participant and join them all
    ///
    /// Any failure fails the phase, and nothing of a failed phase is
    /// returned. Cancellation aborts the outstanding tasks immediately.
    async fn fan_out<T, F, Fut>(
        &self,
        phase: Phase,
        participants: &[Arc<Participant>],
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
        work: F,
    ) -> Result<Vec<T>, RunDeliberationError>
    where
        T: PhaseOutput + Send + 'static,
        F: Fn(Arc<Participant>) -> Fut,
        Fut: Future<Output = Result<T, ParticipantError>> + Send + 'static,
    {
        info!("Phase: {}", phase);
        progress.on_phase_start(&phase, participants.len());

        let collector = PhaseCollector::new();
        let mut join_set = JoinSet::new();
        let mut agents_by_task = std::collections::HashMap::new();

        for participant in participants {
            let agent = participant.id();
            let future = work(Arc::clone(participant));
            let collector = collector.clone();
            let handle = join_set.spawn(async move {
                let result = future.await.map(|item| {
                    let succeeded = item.succeeded();
                    collector.push(item);
                    succeeded
                });
                (agent, result)
            });
            agents_by_task.insert(handle.id(), agent);
        }

        let mut failures = Vec::new();

        loop {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    join_set.abort_all();
                    return Err(RunDeliberationError::Cancelled);
                }
                joined = join_set.join_next() => joined,
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((agent, Ok(succeeded))) => {
                    progress.on_task_complete(&phase, agent, succeeded);
                }
                Ok((_, Err(e))) if e.is_cancelled() => {
                    join_set.abort_all();
                    return Err(RunDeliberationError::Cancelled);
                }
                Ok((agent, Err(e))) => {
                    warn!("Agent {} failed during {}: {}", agent, phase, e.cause());
                    progress.on_task_complete(&phase, agent, false);
                    failures.push((agent, e.cause()));
                }
                Err(join_error) => {
                    let Some(&agent) = agents_by_task.get(&join_error.id()) else {
                        warn!("Task join error: {}", join_error);
                        continue;
                    };
                    warn!("Agent {} task failed during {}: {}", agent, phase, join_error);
                    progress.on_task_complete(&phase, agent, false);
                    failures.push((agent, format!("task failed: {}", join_error)));
                }
            }
        }

        progress.on_phase_complete(&phase);

        if !failures.is_empty() {
            failures.sort_by_key(|(agent, _)| *agent);
            return Err(RunDeliberationError::PhaseFailed { phase, failures });
        }

        Ok(collector.drain())
    }

    fn log_phase_complete(&self, phase: &Phase, items: usize) {
        self.logger.log(ConversationEvent::new(
            "phase_complete",
            json!({
                "phase": phase,
                "items": items,
            }),
        ));
    }
}

/// Collect one ballot, re-prompting once and degrading after a second failure
///
/// Only cancellation is returned as an error.
async fn cast_ballot(
    participant: &Participant,
    task: &str,
    solutions: &[Solution],
    critiques: &[Critique],
    cancel: &CancellationToken,
    logger: &dyn ConversationLogger,
) -> Result<BallotOutcome, ParticipantError> {
    let agent = participant.id();

    let first = match participant.vote(task, solutions, critiques, cancel).await {
        Ok(vote) => {
            return Ok(BallotOutcome {
                vote,
                degraded: None,
            });
        }
        Err(e) if e.is_cancelled() => return Err(e),
        Err(e) => e,
    };

    warn!("Agent {} vote rejected ({}); re-prompting once", agent, first.cause());
    logger.log(ConversationEvent::new(
        "vote_retry",
        json!({
            "agent": agent,
            "error": first.cause(),
        }),
    ));

    match participant.vote(task, solutions, critiques, cancel).await {
        Ok(vote) => Ok(BallotOutcome {
            vote,
            degraded: None,
        }),
        Err(e) if e.is_cancelled() => Err(e),
        Err(e) => {
            warn!(
                "Agent {} vote failed after retry ({}); recording an empty ballot",
                agent,
                e.cause()
            );
            logger.log(ConversationEvent::new(
                "vote_degraded",
                json!({
                    "agent": agent,
                    "error": e.cause(),
                }),
            ));
            Ok(BallotOutcome {
                vote: Vote::failed(agent),
                degraded: Some(e.cause()),
            })
        }
    }
}
