//! Quote command implementation.

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use tracker_config::AppConfig;
use tracker_monitor::{render_table, QuoteSnapshot, SnapshotRow};

use super::{build_fetcher, load_watchlist, rsi_params};
use crate::cli::QuoteArgs;

pub async fn run(args: QuoteArgs, config: &AppConfig) -> Result<()> {
    let symbols: Vec<String> = if args.symbols.is_empty() {
        load_watchlist(config).symbols().to_vec()
    } else {
        args.symbols.iter().map(|s| s.trim().to_uppercase()).collect()
    };

    info!(count = symbols.len(), period = %args.period, "Fetching quotes");

    let mut fetcher = build_fetcher(config)?;
    let params = rsi_params(config);
    let mut rows = Vec::with_capacity(symbols.len());

    for symbol in &symbols {
        // Failures are logged by the fetcher and shown as error rows
        let row = match fetcher.get_series(symbol, args.period).await {
            Ok(series) => {
                let info = fetcher.stock_info_or_default(symbol).await;
                QuoteSnapshot::build_with(symbol, &series, &info, Utc::now(), &params)
                    .map_or_else(|| SnapshotRow::error(symbol), SnapshotRow::Quote)
            }
            Err(_) => SnapshotRow::error(symbol),
        };
        rows.push(row);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_table(&rows));
    }

    Ok(())
}
