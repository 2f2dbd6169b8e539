//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use council_domain::OutputFormat;
use std::path::PathBuf;

/// CLI arguments for council
#[derive(Parser, Debug)]
#[command(name = "council")]
#[command(author, version, about = "Council of Elders - Multi-agent deliberation with ranked-choice voting")]
#[command(long_about = r#"
Council presents a task to several Claude agents, lets them critique each
other's solutions, and picks the best one with a Borda-count vote.

The process has three phases:
1. Generate: every agent solves the task independently
2. Discuss: every agent critiques the others (one or more rounds)
3. Vote: every agent ranks the other solutions; the top score wins

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/council/config.toml   Global config

Example:
  council run "Write a function to check if a number is prime"
  council run --agents 5 --rounds 2 --save "Design a REST API for a blog"
  council view                           # List saved sessions
  council view 2025-01-16_143022_abc123  # View by ID
  council view ./my-session.json         # View by file path
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a council deliberation on a task
    Run(RunArgs),
    /// List saved sessions, or print one in full
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// The task every agent solves
    pub task: String,

    /// Number of agents (minimum 3) [default: 3]
    #[arg(short, long, value_name = "N")]
    pub agents: Option<u32>,

    /// Number of discussion rounds [default: 1]
    #[arg(short, long, value_name = "R")]
    pub rounds: Option<u32>,

    /// Claude model to use (full identifier or alias such as sonnet-4)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Save the session to the sessions directory
    #[arg(short, long)]
    pub save: bool,

    /// Save the session to a specific file path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format: results, full or json
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    pub json: bool,
}

impl RunArgs {
    /// Flags win over the configured default
    pub fn output_format(&self, configured: Option<OutputFormat>) -> OutputFormat {
        if self.json {
            return OutputFormat::Json;
        }
        self.format.or(configured).unwrap_or_default()
    }

    pub fn wants_save(&self) -> bool {
        self.save || self.output.is_some()
    }
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Session file (`*.json`) or part of a saved session's filename
    pub session: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("council").chain(args.iter().copied())).unwrap()
    }

    fn run_args(cli: Cli) -> RunArgs {
        match cli.command {
            Some(Command::Run(args)) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_run_defaults_are_unset() {
        let args = run_args(parse(&["run", "Sort a list"]));
        assert_eq!(args.task, "Sort a list");
        assert!(args.agents.is_none());
        assert!(args.rounds.is_none());
        assert!(!args.wants_save());
        assert_eq!(args.output_format(None), OutputFormat::Results);
    }

    #[test]
    fn test_run_short_flags() {
        let cli = parse(&["run", "-a", "5", "-r", "2", "-m", "opus-4", "-s", "-vv", "task"]);
        assert_eq!(cli.verbose, 2);
        let args = run_args(cli);
        assert_eq!(args.agents, Some(5));
        assert_eq!(args.rounds, Some(2));
        assert_eq!(args.model.as_deref(), Some("opus-4"));
        assert!(args.save);
    }

    #[test]
    fn test_output_path_implies_save() {
        let args = run_args(parse(&["run", "-o", "/tmp/s.json", "task"]));
        assert!(args.wants_save());
    }

    #[test]
    fn test_output_format_precedence() {
        let args = run_args(parse(&["run", "--json", "task"]));
        assert_eq!(args.output_format(Some(OutputFormat::Full)), OutputFormat::Json);

        let args = run_args(parse(&["run", "--format", "full", "task"]));
        assert_eq!(args.output_format(Some(OutputFormat::Json)), OutputFormat::Full);

        let args = run_args(parse(&["run", "task"]));
        assert_eq!(args.output_format(Some(OutputFormat::Full)), OutputFormat::Full);
    }

    #[test]
    fn test_json_conflicts_with_format() {
        let result = Cli::try_parse_from(["council", "run", "--json", "--format", "full", "t"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_requires_task() {
        assert!(Cli::try_parse_from(["council", "run"]).is_err());
    }

    #[test]
    fn test_view_with_and_without_session() {
        match parse(&["view"]).command {
            Some(Command::View(args)) => assert!(args.session.is_none()),
            other => panic!("expected view, got {other:?}"),
        }
        match parse(&["view", "abc123"]).command {
            Some(Command::View(args)) => assert_eq!(args.session.as_deref(), Some("abc123")),
            other => panic!("expected view, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["view", "--no-config", "-q"]);
        assert!(cli.no_config);
        assert!(cli.quiet);
    }
}
