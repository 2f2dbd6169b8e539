//! CLI entrypoint for council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use council_application::{
    GatewayParams, ModelGateway, NoProgress, ProgressNotifier, RunDeliberationUseCase,
    SessionStore,
};
use council_domain::{ConfigIssue, Deliberation, DeliberationConfig, OutputFormat};
use council_infrastructure::{
    AnthropicBackend, AnthropicConfig, ConfigLoader, FileConfig, JsonSessionStore,
    JsonlConversationLogger,
};
use council_presentation::{
    Cli, Command, ConsoleFormatter, ProgressReporter, RunArgs, SimpleProgress, VerboseProgress,
    ViewArgs,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {e}"))?
    };

    if !file_config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Some(Command::Run(args)) => run(args, file_config, cli.verbose, cli.quiet).await,
        Some(Command::View(args)) => view(args, &file_config),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

async fn run(args: RunArgs, mut file_config: FileConfig, verbose: u8, quiet: bool) -> Result<()> {
    // CLI flags override file values before validation
    if let Some(agents) = args.agents {
        file_config.council.agents = agents;
    }
    if let Some(rounds) = args.rounds {
        file_config.council.rounds = rounds;
    }
    if let Some(model) = &args.model {
        file_config.council.model = model.clone();
    }
    report_issues(&file_config.validate())?;

    let (model, _) = file_config.council.parse_model();
    let model = model.context("model name cannot be empty")?;
    let config = DeliberationConfig::new(args.task.clone())
        .with_agents(file_config.council.agents)
        .with_rounds(file_config.council.rounds)
        .with_model(model.clone());
    config.validate()?;

    let api_config = AnthropicConfig::from_env()
        .ok_or_else(|| anyhow!("{} environment variable not set", AnthropicConfig::API_KEY_ENV))?
        .with_base_url(file_config.api.base_url.clone())
        .with_timeout(file_config.api.timeout());

    // === Dependency Injection ===
    let backend = Arc::new(AnthropicBackend::new(api_config).context("failed to create HTTP client")?);
    let gateway = ModelGateway::new(
        backend,
        GatewayParams::new(model).with_max_tokens(file_config.api.max_tokens),
    )
    .with_retry_policy(file_config.retry.to_retry_policy());

    let mut deliberation = Deliberation::new(&config);
    let mut use_case = RunDeliberationUseCase::new(Arc::new(gateway));
    if let Some(dir) = file_config.logging.transcript_dir()
        && let Some(logger) = JsonlConversationLogger::for_session(&dir, &deliberation.id)
    {
        info!("Writing transcript to {}", logger.path().display());
        use_case = use_case.with_logger(Arc::new(logger));
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupted. Shutting down...");
                cancel.cancel();
            }
        });
    }

    let format = args.output_format(file_config.output.format);
    let show_progress = !quiet && format != OutputFormat::Json;
    if show_progress {
        eprintln!("{}", ConsoleFormatter::format_header(&config));
    }

    let progress: Box<dyn ProgressNotifier> = if !show_progress {
        Box::new(NoProgress)
    } else if verbose > 0 {
        Box::new(VerboseProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let outcome = use_case
        .run(&mut deliberation, progress.as_ref(), &cancel)
        .await;

    // Partial results are saved too; a save failure never changes the outcome
    if args.wants_save() {
        save_session(&deliberation, args.output.as_ref(), &file_config);
    }

    outcome?;
    println!("{}", ConsoleFormatter::format(&deliberation, format));
    Ok(())
}

fn view(args: ViewArgs, file_config: &FileConfig) -> Result<()> {
    let store = open_store(file_config)?;

    let Some(reference) = args.session else {
        let entries = store.list().context("failed to list sessions")?;
        print!("{}", ConsoleFormatter::format_session_list(&entries));
        return Ok(());
    };

    let path = store.resolve(&reference)?;
    let deliberation = store
        .load(&path)
        .with_context(|| format!("failed to load session {}", path.display()))?;
    println!("{}", ConsoleFormatter::format_session(&deliberation));
    Ok(())
}

fn open_store(file_config: &FileConfig) -> Result<JsonSessionStore> {
    match file_config.storage.sessions_dir() {
        Some(dir) => Ok(JsonSessionStore::new(dir)),
        None => Ok(JsonSessionStore::open_default()?),
    }
}

fn save_session(deliberation: &Deliberation, output: Option<&PathBuf>, file_config: &FileConfig) {
    let saved = open_store(file_config).and_then(|store| match output {
        Some(path) => store
            .save_to(deliberation, path)
            .map(|()| path.clone())
            .map_err(Into::into),
        None => store.save(deliberation).map_err(Into::into),
    });

    match saved {
        Ok(path) => eprintln!("\nSession saved to: {}", path.display()),
        Err(e) => {
            warn!("Failed to save session: {:#}", e);
            eprintln!("{} failed to save session: {:#}", "warning:".yellow().bold(), e);
        }
    }
}

/// Print every issue; fail if any is an error
fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    let mut errors = 0;
    for issue in issues {
        if issue.is_error() {
            errors += 1;
            eprintln!("{} {}", "error:".red().bold(), issue.message);
        } else {
            eprintln!("{} {}", "warning:".yellow().bold(), issue.message);
        }
    }
    if errors > 0 {
        bail!("invalid configuration ({} error(s))", errors);
    }
    Ok(())
}
