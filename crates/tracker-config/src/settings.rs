//! Configuration structures.

use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub watchlist: WatchlistSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub rsi: RsiSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "rsi-tracker".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Also write logs to this file
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Market data provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Series cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub timeout_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

/// Watchlist persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchlistSettings {
    pub file: String,
    /// Used when the file is missing or unreadable
    pub defaults: Vec<String>,
}

impl Default for WatchlistSettings {
    fn default() -> Self {
        Self {
            file: "watchlist.json".to_string(),
            defaults: ["AAPL", "TSLA", "MSFT", "GOOGL", "NVDA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Watchlist polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Pause between polling rounds
    pub interval_secs: u64,
    /// Pause between symbols within a round
    pub symbol_pause_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            symbol_pause_ms: 2000,
        }
    }
}

/// RSI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiSettings {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiSettings {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}
