//! RSI tracker CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use tracker_config::{load_config, AppConfig};
use tracker_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // validate-config reports load errors itself
    let config = match cli.command {
        Commands::ValidateConfig => AppConfig::default(),
        _ => load_config(&cli.config, false)
            .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?,
    };

    // Setup logging
    let log_level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json_logs = cli.json_logs || config.logging.format == "json";
    let _log_guard = setup_logging(
        &log_level,
        json_logs,
        config.logging.file.as_deref().map(Path::new),
    );

    // Execute command
    match cli.command {
        Commands::Quote(args) => cli::commands::quote::run(args, &config).await,
        Commands::Chart(args) => cli::commands::chart::run(args, &config).await,
        Commands::Watchlist(cmd) => cli::commands::watchlist::run(cmd, &config).await,
        Commands::Watch(args) => cli::commands::watch::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
