//! # memberset CLI entry point
//!
//! Parses command-line arguments, loads configuration, initialises tracing
//! and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use memberset_cli::replay::{run_replay, ReplayArgs};
use memberset_core::PipelineConfig;

/// Incremental tag and IP set membership calculator.
///
/// Replays profile, endpoint and IP address updates through the tag match
/// index and IP-set calculator and reports IP set membership changes.
#[derive(Parser, Debug)]
#[command(name = "memberset", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON-lines update script through the pipeline.
    Replay(ReplayArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(PipelineConfig::default()),
    };

    // Verbosity flags win over the configured filter.
    let filter = match cli.verbose {
        0 => config
            .as_ref()
            .ok()
            .and_then(|c| c.log_filter.as_deref())
            .map_or_else(|| EnvFilter::new("warn"), EnvFilter::new),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("memberset CLI starting");

    let result = config.and_then(|config| match cli.command {
        Commands::Replay(args) => run_replay(&args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
