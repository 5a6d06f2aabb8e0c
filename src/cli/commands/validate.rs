//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use tracker_config::{load_config, to_toml};

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path, true) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Provider: {}", config.provider.base_url);
            println!("Cache timeout: {}s", config.cache.timeout_secs);
            println!("Watchlist file: {}", config.watchlist.file);
            println!(
                "Refresh: every {}s, {}ms between symbols",
                config.refresh.interval_secs, config.refresh.symbol_pause_ms
            );
            println!(
                "RSI: {}-period, overbought {} / oversold {}",
                config.rsi.period, config.rsi.overbought, config.rsi.oversold
            );
            println!();
            println!("Effective configuration:");
            print!("{}", to_toml(&config)?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
