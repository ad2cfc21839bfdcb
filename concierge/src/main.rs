//! Interactive terminal loop for the Giulia assistant.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use concierge::{AppConfig, ConciergeError, ConfigOverrides, ProviderKind, build_orchestrator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

const FAREWELL: &str = "Leaving so soon? I'll be waiting for your return, boss.";

#[derive(Debug, Parser)]
#[command(name = "concierge", version, about = "Giulia AI assistant")]
struct Cli {
    /// Start Giulia in mock mode without API costs.
    #[arg(long)]
    mock: bool,

    /// Backend to use: primary (gemini), secondary (openai) or mock.
    #[arg(long)]
    provider: Option<String>,

    /// Session ID for conversation history.
    #[arg(long)]
    session: Option<String>,

    /// Backend model name.
    #[arg(long)]
    model: Option<String>,

    /// Path to a TOML config file (defaults to ./concierge.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mock: self.mock,
            provider: self.provider.clone(),
            session_id: self.session.clone(),
            model: self.model.clone(),
        }
    }
}

fn setup_logging(log_path: &Path, verbose: bool) -> Result<(), ConciergeError> {
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).map_err(|err| {
            ConciergeError::configuration(format!(
                "failed to create log directory '{}': {err}",
                log_dir.display()
            ))
        })?;
    }

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|err| {
            ConciergeError::configuration(format!(
                "failed to open log file '{}': {err}",
                log_path.display()
            ))
        })?;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .try_init()
        .map_err(|err| ConciergeError::configuration(format!("failed to set subscriber: {err}")))?;

    info!(verbose, "logging initialized");
    Ok(())
}

async fn run(cli: Cli) -> Result<(), ConciergeError> {
    let config = AppConfig::load(cli.config.as_deref(), &cli.overrides())?;
    setup_logging(&config.log_file(), cli.verbose)?;

    info!(
        provider = %config.provider,
        model = config.model.as_deref().unwrap_or("default"),
        session_id = %config.session_id,
        "starting Giulia"
    );
    if config.provider == ProviderKind::Mock {
        info!("running in mock mode, no backend calls will be made");
    }

    let mut orchestrator = build_orchestrator(&config).await?;

    println!("--- Giulia is online ({}) ---", orchestrator.provider_identity());
    println!("(Type 'exit' or 'quit' to end the session)\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!(error = %err, "failed to read from stdin");
                break;
            }
        };

        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("\nGiulia: {FAREWELL}");
            break;
        }
        if input.is_empty() {
            continue;
        }

        println!("Giulia is thinking...");
        let reply = orchestrator.handle(input).await;
        println!("Giulia: {reply}\n");
    }

    info!(session_id = %orchestrator.session_id(), "session closed");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "startup failed");
            eprintln!("concierge: {err}");
            ExitCode::FAILURE
        }
    }
}
