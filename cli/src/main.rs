//! Surveyor CLI - answer a form in the terminal and inspect what was stored
//!
//! # Commands
//! - `surveyor take` - Answer the form, restarting after each submission
//! - `surveyor submissions` - List stored submissions, newest first
//! - `surveyor check` - Lint the form catalog
//! - `surveyor schematic` - Export the form as a graph

mod check;
mod config;
mod observe;
mod prompt;
mod schematic;
mod source;
mod submissions;
mod take;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::SurveyorConfig;
use source::{SourceArgs, SourceChoice};
use std::path::PathBuf;
use std::sync::Arc;
use surveyor_core::sink::SubmissionSink;
use surveyor_db::SqliteSubmissionStore;
use surveyor_runtime::{FormSession, SessionConfig, SessionDriver};
use tokio::io::BufReader;

/// Surveyor CLI
#[derive(Parser)]
#[command(name = "surveyor")]
#[command(author, version, about = "Answer survey forms from the terminal")]
struct Cli {
    /// Config file (default: ./surveyor.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Submission database, overrides config and environment
    #[arg(long, global = true, value_name = "URL")]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the form in the terminal
    Take {
        #[command(flatten)]
        source: SourceArgs,

        /// Exit after the first submission
        #[arg(long)]
        once: bool,
    },

    /// List stored submissions, newest first
    Submissions {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Keep printing new submissions as they arrive
        #[arg(short, long)]
        follow: bool,
    },

    /// Lint the form catalog
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Export the form as a schematic graph (JSON)
    Schematic {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SurveyorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(database) = cli.database {
        config.store.database_url = database;
    }
    observe::init_tracing(config.log_filter.as_deref());

    match cli.command {
        Commands::Take { source, once } => run_take_command(&source, &config, once).await,
        Commands::Submissions { json, follow } => {
            submissions::run_submissions_command(&config.store.database_url, json, follow).await
        }
        Commands::Check { source } => check::run_check_command(&source, &config).await,
        Commands::Schematic { source, output } => {
            schematic::run_schematic_command(&source, &config, output.as_deref()).await
        }
    }
}

async fn run_take_command(args: &SourceArgs, config: &SurveyorConfig, once: bool) -> Result<()> {
    let choice = SourceChoice::resolve(args, config);
    tracing::info!(source = %choice.describe(), "Starting survey");

    let store = Arc::new(
        SqliteSubmissionStore::connect(&config.store.database_url)
            .await
            .with_context(|| format!("Failed to open submission store at {}", config.store.database_url))?,
    );
    let feed = store.subscribe();

    let session = FormSession::new(choice.build(config)?, Arc::clone(&store));
    let handle = SessionDriver::spawn(
        session,
        SessionConfig::default().with_restart_delay(config.restart_delay()),
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let result = take::drive(&handle, &feed, stdin, &mut stdout, once).await;
    handle.shutdown().await;

    match result? {
        take::Exit::Submitted => tracing::info!("Survey finished"),
        take::Exit::Quit => println!(),
    }
    Ok(())
}
