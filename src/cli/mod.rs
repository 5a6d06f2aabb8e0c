//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracker_core::types::Period;

#[derive(Parser)]
#[command(name = "rsi-tracker")]
#[command(author, version, about = "Stock watchlist tracker with RSI, volume and market-cap charts")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show price, change and RSI for symbols
    Quote(QuoteArgs),
    /// Show chart data for one symbol
    Chart(ChartArgs),
    /// Manage the watchlist
    #[command(subcommand)]
    Watchlist(WatchlistCommand),
    /// Continuously refresh the watchlist
    Watch(WatchArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct QuoteArgs {
    /// Symbols to quote; the watchlist when empty
    pub symbols: Vec<String>,

    /// Period used for the RSI series
    #[arg(short, long, default_value = "1mo", value_parser = parse_period)]
    pub period: Period,

    /// Print rows as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ChartArgs {
    /// Symbol to chart
    pub symbol: String,

    /// Chart period (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, max)
    #[arg(short, long, default_value = "6mo", value_parser = parse_period)]
    pub period: Period,

    /// Print full chart data as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum WatchlistCommand {
    /// List watched symbols
    List,
    /// Add a symbol after checking it resolves
    Add {
        symbol: String,
        /// Skip the lookup check
        #[arg(long)]
        no_verify: bool,
    },
    /// Remove a symbol
    Remove { symbol: String },
}

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Print a table after each round instead of the dashboard
    #[arg(long)]
    pub plain: bool,

    /// Seconds between rounds (overrides the configuration file)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

fn parse_period(s: &str) -> Result<Period, String> {
    s.parse::<Period>().map_err(|e| e.to_string())
}
