//! Progress reporting for deliberations

use colored::Colorize;
use council_application::ports::progress::ProgressNotifier;
use council_domain::{AgentId, Critique, Phase, Solution, Vote};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with one indicatif bar per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut guard) = self.phase_bar.lock() {
            f(&mut guard);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name());
        pb.set_message("Starting...");
        self.with_bar(|bar| *bar = Some(pb));
    }

    fn on_task_complete(&self, _phase: &Phase, agent: AgentId, success: bool) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.as_ref() {
                let status = if success {
                    format!("{} Agent {}", "v".green(), agent)
                } else {
                    format!("{} Agent {}", "x".red(), agent)
                };
                pb.set_message(status);
                pb.inc(1);
            }
        });
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.take() {
                pb.finish_with_message("done".green().to_string());
            }
        });
    }

    fn on_vote_degraded(&self, agent: AgentId, reason: &str) {
        let line = format!("{} Agent {} vote discarded: {}", "!".yellow(), agent, reason);
        if self.multi.println(&line).is_err() {
            eprintln!("{line}");
        }
    }
}

/// Plain `Phase... done` lines, one per phase
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, _total_tasks: usize) {
        eprint!("{}... ", phase.display_name());
    }

    fn on_task_complete(&self, _phase: &Phase, _agent: AgentId, _success: bool) {}

    fn on_phase_complete(&self, _phase: &Phase) {
        eprintln!("done");
    }

    fn on_vote_degraded(&self, agent: AgentId, reason: &str) {
        eprintln!("\n  {} Agent {} vote discarded: {}", "!".yellow(), agent, reason);
    }
}

/// Prints every solution, critique and ballot as its phase completes
pub struct VerboseProgress;

impl VerboseProgress {
    pub fn solution_block(solution: &Solution) -> String {
        format!(
            "\n{}\n{}\n",
            format!("--- Agent {} Solution ---", solution.agent_id).yellow().bold(),
            solution.content
        )
    }

    pub fn critique_block(critique: &Critique) -> String {
        format!(
            "\n{}\n{}\n",
            format!(
                "--- Agent {} Critique (Round {}) ---",
                critique.agent_id, critique.round
            )
            .yellow()
            .bold(),
            critique.content
        )
    }

    pub fn vote_block(vote: &Vote) -> String {
        format!(
            "\n{}\nRankings: {}\nReasoning: {}\n",
            format!("--- Agent {} Vote ---", vote.voter_id).yellow().bold(),
            crate::output::console::ConsoleFormatter::id_list(&vote.rankings),
            vote.reasoning
        )
    }
}

impl ProgressNotifier for VerboseProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} agents)",
            "->".cyan(),
            phase.display_name().bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &Phase, agent: AgentId, success: bool) {
        if success {
            eprintln!("  {} Agent {}", "v".green(), agent);
        } else {
            eprintln!("  {} Agent {} (failed)", "x".red(), agent);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {}

    fn on_solution(&self, solution: &Solution) {
        eprint!("{}", Self::solution_block(solution));
    }

    fn on_critique(&self, critique: &Critique) {
        eprint!("{}", Self::critique_block(critique));
    }

    fn on_vote(&self, vote: &Vote) {
        eprint!("{}", Self::vote_block(vote));
    }

    fn on_vote_degraded(&self, agent: AgentId, reason: &str) {
        eprintln!("  {} Agent {} vote discarded: {}", "!".yellow(), agent, reason);
    }
}
