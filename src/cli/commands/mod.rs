//! CLI command implementations.

pub mod chart;
pub mod quote;
pub mod validate;
pub mod watch;
pub mod watchlist;

use anyhow::{Context, Result};
use chrono::Duration;
use std::path::PathBuf;
use tracker_config::AppConfig;
use tracker_data::{MarketDataFetcher, SeriesCache, YahooConfig, YahooProvider};
use tracker_monitor::{RsiParams, Watchlist};

/// Fetcher over the live Yahoo provider.
pub type Fetcher = MarketDataFetcher<YahooProvider>;

/// Build the provider and cache from configuration.
pub fn build_fetcher(config: &AppConfig) -> Result<Fetcher> {
    let yahoo = YahooConfig::new(config.provider.base_url.as_str())
        .with_timeout(std::time::Duration::from_secs(config.provider.timeout_secs));
    let provider = YahooProvider::new(yahoo).context("Failed to create market data client")?;

    let timeout = cache_timeout(config.cache.timeout_secs)?;
    Ok(MarketDataFetcher::new(provider, SeriesCache::new(timeout)))
}

fn cache_timeout(secs: u64) -> Result<Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .with_context(|| format!("cache.timeout_secs out of range: {}", secs))
}

pub fn rsi_params(config: &AppConfig) -> RsiParams {
    RsiParams {
        period: config.rsi.period,
        overbought: config.rsi.overbought,
        oversold: config.rsi.oversold,
    }
}

pub fn watchlist_path(config: &AppConfig) -> PathBuf {
    PathBuf::from(&config.watchlist.file)
}

pub fn load_watchlist(config: &AppConfig) -> Watchlist {
    Watchlist::load_or(&watchlist_path(config), &config.watchlist.defaults)
}
