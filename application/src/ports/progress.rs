//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use council_domain::{AgentId, Critique, Phase, Solution, Vote};

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, full transcript).
/// Every callback runs on the orchestrating task, never inside a
/// participant task.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when one participant finishes its part of a phase
    fn on_task_complete(&self, phase: &Phase, agent: AgentId, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);

    // ==================== Artifact Callbacks ====================

    /// Called for every solution once the Generate phase is merged
    fn on_solution(&self, _solution: &Solution) {}

    /// Called for every critique once its round is merged
    fn on_critique(&self, _critique: &Critique) {}

    /// Called for every ballot once the Vote phase is merged
    fn on_vote(&self, _vote: &Vote) {}

    /// Called when an agent's ballot was replaced by an empty one
    fn on_vote_degraded(&self, _agent: AgentId, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _agent: AgentId, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
