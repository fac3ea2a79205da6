mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use agent_state_lib::Settings;
use agent_state_lib::consts::SCOPE_ENV;

use crate::output::{OutputFormat, print_error};

/// agent-state - persistent state and event log for long-running agents
#[derive(Parser)]
#[command(name = "agent-state")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Scope directory (absolute path). Defaults to the current directory.
  #[arg(short = 'C', long, global = true, env = SCOPE_ENV)]
  directory: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Replace the saved state
  UpdateState {
    /// What the agent is currently trying to do
    state: String,
  },

  /// Print the saved state
  LoadState,

  /// Append an event to the log
  LogEvent {
    /// The event message to append
    message: String,
  },

  /// Print the last NUM_CHARS characters of the log
  LoadLog {
    /// Number of characters to return from the end of the log
    #[arg(allow_negative_numbers = true)]
    num_chars: i128,
  },

  /// Serve the state and log tools over MCP on stdio
  Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> Result<()> {
  let settings = Settings::new(cli.directory);

  match cli.command {
    Commands::UpdateState { state } => cmd::cmd_update_state(&default_scope(&settings)?, &state, cli.output),
    Commands::LoadState => cmd::cmd_load_state(&default_scope(&settings)?, cli.output),
    Commands::LogEvent { message } => cmd::cmd_log_event(&default_scope(&settings)?, &message, cli.output),
    Commands::LoadLog { num_chars } => cmd::cmd_load_log(&default_scope(&settings)?, num_chars, cli.output),
    Commands::Serve => cmd::cmd_serve(settings).await,
  }
}

fn default_scope(settings: &Settings) -> Result<PathBuf> {
  settings
    .default_scope()
    .context("Failed to determine the default directory")
}

/// Logs always go to stderr; stdout carries command output and MCP traffic.
fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
