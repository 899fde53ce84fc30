//! GitVault CLI - Command-line interface for GitVault
//!
//! Provides commands for:
//! - Running a sync (`gitvault sync`)
//! - Viewing the last-sync status (`gitvault status`)
//! - Checking repository reachability and API quota (`gitvault check`)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod notify;
mod output;

use commands::{check::CheckCommand, status::StatusCommand, sync::SyncCommand};
use gitvault_core::config::Config;
use output::Output;

#[derive(Debug, Parser)]
#[command(name = "gitvault", version, about = "Mirror a GitHub repository branch into a local vault")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synchronize the vault with the remote repository
    Sync(SyncCommand),
    /// Show last-sync status
    Status(StatusCommand),
    /// Check repository reachability and API quota
    Check(CheckCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);
    let out = Output::new(cli.json, cli.quiet);

    match cli.command {
        Commands::Sync(cmd) => cmd.execute(&config, &out).await,
        Commands::Status(cmd) => cmd.execute(&config, &out).await,
        Commands::Check(cmd) => cmd.execute(&config, &out).await,
    }
}
