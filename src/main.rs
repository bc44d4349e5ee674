//! Price forecasting CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use pricecast_config::load_config;
use pricecast_monitor::setup_logging;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration from the environment".to_string(),
    })?;

    // Setup logging
    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file.as_ref().map(PathBuf::from));
    let _guard = setup_logging(
        &log_level,
        cli.json_logs || config.logging.is_json(),
        log_file.as_deref(),
    )?;

    // Execute command
    match cli.command {
        Commands::Forecast(args) => {
            let sources = cli::sources::build(cli.data.as_deref(), &config)?;
            cli::commands::forecast::run(args, &config, sources).await
        }
        Commands::Resolve(args) => {
            let sources = cli::sources::build(cli.data.as_deref(), &config)?;
            cli::commands::resolve::run(args, sources).await
        }
        Commands::History(args) => {
            let sources = cli::sources::build(cli.data.as_deref(), &config)?;
            cli::commands::history::run(args, &config, sources).await
        }
        Commands::ValidateConfig(args) => cli::commands::validate::run(&config, &args),
    }
}
