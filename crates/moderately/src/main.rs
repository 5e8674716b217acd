//! Moderately - command-line client for the Moderately AI platform
//!
//! Main entry point for the `moderately` CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{datasets, executions, files, pipelines, teams, users};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Moderately - manage files, datasets and pipelines from the command line
#[derive(Parser)]
#[command(name = "moderately")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// API key
    #[arg(long, global = true, env = "MODERATELY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Team to operate on
    #[arg(long, global = true, env = "MODERATELY_TEAM_ID")]
    pub team_id: Option<String>,

    /// API base URL (default: https://api.moderately.ai)
    #[arg(long, global = true, env = "MODERATELY_BASE_URL")]
    pub base_url: Option<String>,

    /// Retry attempts for transient failures
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload, download and manage files
    Files(files::FilesArgs),

    /// Manage datasets
    Datasets(datasets::DatasetsArgs),

    /// Manage pipelines
    Pipelines(pipelines::PipelinesArgs),

    /// Inspect and wait on pipeline executions
    Executions(executions::ExecutionsArgs),

    /// List users in the team
    Users(users::UsersArgs),

    /// List teams
    Teams(teams::TeamsArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_filter = if cli.verbose {
        "moderately=debug,moderately_client=debug,warn"
    } else {
        "moderately=info,moderately_client=warn,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Logs go to stderr so stdout stays parseable
    if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(cli.verbose)
            .with_writer(std::io::stderr)
            .init();
    }

    let ctx = commands::Context {
        api_key: cli.api_key,
        team_id: cli.team_id,
        base_url: cli.base_url,
        max_attempts: cli.max_attempts,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Files(args) => files::run(args, &ctx).await,
        Commands::Datasets(args) => datasets::run(args, &ctx).await,
        Commands::Pipelines(args) => pipelines::run(args, &ctx).await,
        Commands::Executions(args) => executions::run(args, &ctx).await,
        Commands::Users(args) => users::run(args, &ctx).await,
        Commands::Teams(args) => teams::run(args, &ctx).await,
    }
}
