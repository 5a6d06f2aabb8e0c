//! Chart command implementation.

use anyhow::{Context, Result};
use tracing::info;
use tracker_config::AppConfig;
use tracker_monitor::ChartData;

use super::{build_fetcher, rsi_params};
use crate::cli::ChartArgs;

pub async fn run(args: ChartArgs, config: &AppConfig) -> Result<()> {
    let symbol = args.symbol.trim().to_uppercase();
    info!(symbol = %symbol, period = %args.period, "Loading chart");

    let mut fetcher = build_fetcher(config)?;
    let series = fetcher.get_series(&symbol, args.period).await?;
    let info = fetcher.stock_info_or_default(&symbol).await;

    let data = ChartData::build_with(&symbol, args.period, &series, &info, &rsi_params(config))
        .context("Series is empty")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print!("{}", data.summary());
    }

    Ok(())
}
