//! Console output formatter for deliberation results

use colored::Colorize;
use council_application::SessionEntry;
use council_domain::{AgentId, Deliberation, DeliberationConfig, OutputFormat};
use std::fmt::Write as _;

/// Formats deliberations for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a finished deliberation in the requested format
    pub fn format(deliberation: &Deliberation, format: OutputFormat) -> String {
        match format {
            OutputFormat::Results => Self::format_results(deliberation),
            OutputFormat::Full => Self::format_session(deliberation),
            OutputFormat::Json => Self::format_json(deliberation),
        }
    }

    /// Banner printed before the first phase starts
    pub fn format_header(config: &DeliberationConfig) -> String {
        format!(
            "{}\n{}\n{} {}\n{}\n",
            "Council of Elders".cyan().bold(),
            "=".repeat(20).cyan(),
            "Task:".bold(),
            config.task,
            format!(
                "Agents: {} | Rounds: {} | Model: {}",
                config.agent_count, config.rounds, config.model
            )
            .dimmed()
        )
    }

    /// Scores, then the winning solution or every tied solution
    pub fn format_results(deliberation: &Deliberation) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header("Results"));

        for (id, points) in &deliberation.scores {
            let line = format!("Agent {}: {} points", id, points);
            if deliberation.winner_id == Some(*id) {
                let _ = writeln!(output, "{} {}", line.green().bold(), "* WINNER".green().bold());
            } else {
                let _ = writeln!(output, "{}", line);
            }
        }
        output.push('\n');

        if deliberation.is_tie {
            let _ = writeln!(
                output,
                "{}\n",
                format!("TIE between Agents {}", Self::id_list(&deliberation.tied_agents))
                    .yellow()
                    .bold()
            );
            output.push_str("All tied solutions are shown below for your review:\n");
            for solution in deliberation.tied_solutions() {
                let _ = write!(
                    output,
                    "\n{}\n{}\n",
                    format!("--- Solution (Agent {}) ---", solution.agent_id).yellow(),
                    solution.content
                );
            }
        } else if let Some(solution) = deliberation.winning_solution() {
            let title = format!("Winning Solution (Agent {})", solution.agent_id);
            let _ = writeln!(output, "{}", title.green().bold());
            let _ = writeln!(output, "{}", "-".repeat(title.len()));
            let _ = writeln!(output, "{}", solution.content);
        }

        output
    }

    /// Full transcript of a (possibly partial) deliberation
    pub fn format_session(deliberation: &Deliberation) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "{} {}", "Session:".cyan().bold(), deliberation.id);
        let _ = writeln!(output, "{} {}", "Task:".cyan().bold(), deliberation.task);
        let _ = writeln!(
            output,
            "{}",
            format!(
                "Agents: {} | Rounds: {} | Model: {} | Created: {}",
                deliberation.agent_count,
                deliberation.rounds,
                deliberation.model,
                deliberation.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            )
            .dimmed()
        );
        if !deliberation.is_complete() {
            let _ = writeln!(output, "{}", "(incomplete: the run was aborted)".yellow());
        }

        if !deliberation.solutions.is_empty() {
            output.push_str(&Self::section_header("Solutions"));
            for solution in &deliberation.solutions {
                let _ = write!(
                    output,
                    "\n{}\n{}\n",
                    format!("--- Agent {} Solution ---", solution.agent_id).yellow().bold(),
                    solution.content
                );
            }
        }

        for round in 1..=deliberation.rounds {
            let mut critiques = deliberation.critiques_in_round(round).peekable();
            if critiques.peek().is_none() {
                continue;
            }
            output.push_str(&Self::section_header(&format!("Discussion Round {}", round)));
            for critique in critiques {
                let _ = write!(
                    output,
                    "\n{}\n{}\n",
                    format!("--- Agent {} Critique ---", critique.agent_id).yellow().bold(),
                    critique.content
                );
            }
        }

        if !deliberation.votes.is_empty() {
            output.push_str(&Self::section_header("Votes"));
            for vote in &deliberation.votes {
                let _ = write!(
                    output,
                    "\n{}\nRankings: {}\nReasoning: {}\n",
                    format!("--- Agent {} Vote ---", vote.voter_id).yellow().bold(),
                    Self::id_list(&vote.rankings),
                    vote.reasoning
                );
            }
        }

        if !deliberation.scores.is_empty() {
            output.push_str(&Self::format_results(deliberation));
        }

        output
    }

    /// One line per saved session, in the order given
    pub fn format_session_list(entries: &[SessionEntry]) -> String {
        if entries.is_empty() {
            return format!("{}\n", "No saved sessions.".dimmed());
        }

        let mut output = String::new();
        let _ = writeln!(output, "{}", "Council Sessions".cyan().bold());
        for entry in entries {
            let outcome = if entry.is_tie {
                format!("TIE {}", Self::id_list(&entry.tied_agents)).yellow()
            } else {
                match entry.winner_id {
                    Some(id) => format!("Agent {} won", id).green(),
                    None => "no result".dimmed(),
                }
            };
            let _ = writeln!(
                output,
                "{}  {}  {} agents  {}  {}",
                entry.id.get(..6).unwrap_or(&entry.id).bold(),
                entry.created_at.format("%Y-%m-%d %H:%M"),
                entry.agent_count,
                outcome,
                Self::truncate(&entry.task, 50)
            );
        }
        output
    }

    /// Pretty JSON, identical to the persisted format
    pub fn format_json(deliberation: &Deliberation) -> String {
        serde_json::to_string_pretty(deliberation).unwrap_or_else(|_| "{}".to_string())
    }

    /// `[1 2 3]`
    pub fn id_list(ids: &[AgentId]) -> String {
        let inner: Vec<String> = ids.iter().map(ToString::to_string).collect();
        format!("[{}]", inner.join(" "))
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(title.len()))
    }

    fn truncate(text: &str, max_chars: usize) -> String {
        let single_line = text.lines().next().unwrap_or_default();
        if single_line.chars().count() <= max_chars && single_line.len() == text.len() {
            return text.to_string();
        }
        let cut: String = single_line.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{BordaTally, Critique, Solution, Vote};
    use std::path::PathBuf;

    fn plain() {
        colored::control::set_override(false);
    }

    fn deliberation(votes: Vec<Vote>) -> Deliberation {
        let config = DeliberationConfig::new("Sort a list");
        let mut d = Deliberation::new(&config);
        d.record_solutions(AgentId::all(3).map(|id| Solution::new(id, format!("solution {id}"))));
        d.record_critiques(AgentId::all(3).map(|id| Critique::new(id, 1, format!("critique {id}"))));
        d.record_votes(votes);
        d.apply_tally(BordaTally::compute(3, &d.votes));
        d.complete();
        d
    }

    fn vote(voter: u32, rankings: &[u32]) -> Vote {
        Vote::new(
            AgentId::new(voter),
            rankings.iter().copied().map(AgentId::new).collect(),
            format!("reason {voter}"),
        )
    }

    #[test]
    fn test_header() {
        plain();
        let config = DeliberationConfig::new("Sort a list").with_agents(5).with_rounds(2);
        let header = ConsoleFormatter::format_header(&config);
        assert!(header.starts_with("Council of Elders\n"));
        assert!(header.contains("Task: Sort a list"));
        assert!(header.contains("Agents: 5 | Rounds: 2 | Model: claude-sonnet-4-20250514"));
    }

    #[test]
    fn test_results_with_winner() {
        plain();
        // 1: 2 + 2 = 4, 2: 2 + 1 = 3, 3: 1 + 1 = 2
        let d = deliberation(vec![vote(1, &[2, 3]), vote(2, &[1, 3]), vote(3, &[1, 2])]);
        let output = ConsoleFormatter::format_results(&d);
        assert!(output.contains("Agent 1: 4 points * WINNER\n"));
        assert!(output.contains("Agent 2: 3 points\n"));
        assert!(output.contains("Agent 3: 2 points\n"));
        assert!(output.contains("Winning Solution (Agent 1)\n"));
        assert!(output.trim_end().ends_with("solution 1"));
        assert!(!output.contains("TIE"));
    }

    #[test]
    fn test_results_with_tie() {
        plain();
        let d = deliberation(vec![vote(1, &[2, 3]), vote(2, &[3, 1]), vote(3, &[1, 2])]);
        let output = ConsoleFormatter::format_results(&d);
        assert!(!output.contains("WINNER"));
        assert!(output.contains("TIE between Agents [1 2 3]"));
        let first = output.find("--- Solution (Agent 1) ---\nsolution 1").unwrap();
        let third = output.find("--- Solution (Agent 3) ---\nsolution 3").unwrap();
        assert!(first < third);
    }

    #[test]
    fn test_session_transcript_sections() {
        plain();
        let d = deliberation(vec![vote(1, &[2, 3]), vote(2, &[1, 3]), Vote::failed(AgentId::new(3))]);
        let output = ConsoleFormatter::format_session(&d);
        for needle in [
            "--- Agent 2 Solution ---\nsolution 2",
            "Discussion Round 1",
            "--- Agent 3 Critique ---\ncritique 3",
            "--- Agent 1 Vote ---\nRankings: [2 3]\nReasoning: reason 1",
            "--- Agent 3 Vote ---\nRankings: []\nReasoning: vote failed to parse",
            "Results",
        ] {
            assert!(output.contains(needle), "missing {needle:?}");
        }
        assert!(!output.contains("incomplete"));
    }

    #[test]
    fn test_partial_session_is_marked() {
        plain();
        let mut d = Deliberation::new(&DeliberationConfig::new("t"));
        d.record_solutions(vec![Solution::new(AgentId::new(1), "only")]);
        let output = ConsoleFormatter::format_session(&d);
        assert!(output.contains("(incomplete: the run was aborted)"));
        assert!(!output.contains("Results"));
    }

    #[test]
    fn test_session_list() {
        plain();
        let winner = deliberation(vec![vote(1, &[2, 3]), vote(2, &[1, 3]), vote(3, &[1, 2])]);
        let tie = deliberation(vec![vote(1, &[2, 3]), vote(2, &[3, 1]), vote(3, &[1, 2])]);
        let entries = vec![
            SessionEntry::from_deliberation(PathBuf::from("a.json"), &winner),
            SessionEntry::from_deliberation(PathBuf::from("b.json"), &tie),
        ];
        let output = ConsoleFormatter::format_session_list(&entries);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(winner.short_id()));
        assert!(lines[1].contains("Agent 1 won"));
        assert!(lines[2].contains("TIE [1 2 3]"));
        assert!(lines[2].ends_with("Sort a list"));
    }

    #[test]
    fn test_empty_session_list() {
        plain();
        assert_eq!(ConsoleFormatter::format_session_list(&[]), "No saved sessions.\n");
    }

    #[test]
    fn test_json_matches_persisted_record() {
        let d = deliberation(vec![vote(1, &[2, 3]), vote(2, &[1, 3]), vote(3, &[1, 2])]);
        let back: Deliberation = serde_json::from_str(&ConsoleFormatter::format_json(&d)).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(ConsoleFormatter::truncate("short", 10), "short");
        assert_eq!(ConsoleFormatter::truncate("abcdefghij", 4), "abcd...");
        assert_eq!(ConsoleFormatter::truncate("line one\nline two", 50), "line one...");
        assert_eq!(ConsoleFormatter::truncate("ééééé", 2), "éé...");
    }
}
