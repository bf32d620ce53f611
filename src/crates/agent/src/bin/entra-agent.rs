//! entra-agent CLI
//!
//! Main entry point: run one natural-language command, or serve the HTTP API.

use clap::{Parser, Subcommand};
use entra_agent::cli::{render_json, render_text};
use entra_agent::{build_agent, serve, AgentConfig, AppState};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use utils::ServerConfig;

#[derive(Parser)]
#[command(name = "entra-agent")]
#[command(about = "Process natural language commands for Entra ID operations", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(args_conflicts_with_subcommands = true, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Natural language command (e.g. "Create an app registration named MyApp")
    words: Vec<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Optional YAML or JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to bind (defaults to HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to PORT or 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Per-request timeout in seconds (defaults to REQUEST_TIMEOUT_SECS or 120)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        /// Optional YAML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Serve {
            host,
            port,
            timeout,
            config,
        }) => run_server(config, host, port, timeout).await,
        None => run_command(cli.config, cli.words.join(" "), cli.json).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            println!("\n❌ Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run_command(
    config: Option<PathBuf>,
    command: String,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let config = AgentConfig::load(config.as_deref())?;
    let agent = build_agent(&config)?;

    let outcome = agent.process_command(&command).await;

    if json {
        println!("{}", render_json(&outcome)?);
    } else {
        println!("{}", render_text(&outcome));
    }

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_server(
    config: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    timeout: Option<u64>,
) -> anyhow::Result<ExitCode> {
    let mut server = ServerConfig::from_env("")?;
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }
    if let Some(secs) = timeout {
        server = server.with_timeout(Duration::from_secs(secs));
    }

    // Start even when the agent cannot be built so callers get a clear 500.
    let state = match AgentConfig::load(config.as_deref()).and_then(|c| build_agent(&c)) {
        Ok(agent) => AppState::new(Arc::new(agent)),
        Err(err) => {
            tracing::error!(error = %err, "Failed to initialize agent");
            AppState::uninitialized()
        }
    };

    serve(&server, state).await?;
    Ok(ExitCode::SUCCESS)
}
