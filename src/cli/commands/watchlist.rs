//! Watchlist command implementation.

use anyhow::{Context, Result};
use tracker_config::AppConfig;
use tracker_core::types::Period;

use super::{build_fetcher, load_watchlist, watchlist_path};
use crate::cli::WatchlistCommand;

pub async fn run(command: WatchlistCommand, config: &AppConfig) -> Result<()> {
    let path = watchlist_path(config);
    let mut watchlist = load_watchlist(config);

    match command {
        WatchlistCommand::List => {
            for symbol in watchlist.symbols() {
                println!("{}", symbol);
            }
        }
        WatchlistCommand::Add { symbol, no_verify } => {
            let symbol = symbol.trim().to_uppercase();
            if !no_verify {
                // A symbol that cannot produce a short series is not worth watching
                let mut fetcher = build_fetcher(config)?;
                fetcher
                    .get_series(&symbol, Period::Day5)
                    .await
                    .with_context(|| format!("Could not find data for {}", symbol))?;
            }
            let added = watchlist.add(&symbol)?;
            watchlist
                .save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
            println!("Added {} to watchlist", added);
        }
        WatchlistCommand::Remove { symbol } => {
            if watchlist.remove(&symbol) {
                watchlist
                    .save(&path)
                    .with_context(|| format!("Failed to save {}", path.display()))?;
                println!("Removed {} from watchlist", symbol.trim().to_uppercase());
            } else {
                anyhow::bail!("{} is not in the watchlist", symbol.trim().to_uppercase());
            }
        }
    }

    Ok(())
}
