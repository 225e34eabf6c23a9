//! ketto command-line entry point.
//!
//! Runs pedigree searches and cache maintenance from a terminal. Progress and
//! results go to stdout; logs go to stderr.

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Search(args) => commands::search(args).await,
        Command::SearchDay(args) => commands::search_day(args).await,
        Command::CacheStatus(args) => commands::cache_status(args).await,
        Command::ClearCache => commands::clear_cache().await,
        Command::Labels(args) => commands::labels(args),
    }
}
