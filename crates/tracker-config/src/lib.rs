//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, CacheSettings, LoggingConfig, ProviderConfig, RefreshSettings,
    RsiSettings, WatchlistSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use thiserror::Error;

/// Longest accepted cache timeout, one week.
pub const MAX_CACHE_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] ConfigError),

    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error("Could not render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Load configuration from file and environment.
///
/// Environment variables use the `TRACKER` prefix with `__` as the section
/// separator, e.g. `TRACKER__CACHE__TIMEOUT_SECS=60`.
pub fn load_config(path: &Path, required: bool) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(
            Environment::with_prefix("TRACKER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = config.try_deserialize()?;
    validate(&config)?;
    Ok(config)
}

/// Check values a deserializer cannot.
pub fn validate(config: &AppConfig) -> Result<(), SettingsError> {
    if config.rsi.period == 0 {
        return Err(SettingsError::Invalid("rsi.period must be at least 1".into()));
    }
    if config.rsi.oversold >= config.rsi.overbought {
        return Err(SettingsError::Invalid(
            "rsi.oversold must be below rsi.overbought".into(),
        ));
    }
    if config.cache.timeout_secs == 0 {
        return Err(SettingsError::Invalid(
            "cache.timeout_secs must be positive".into(),
        ));
    }
    if config.cache.timeout_secs > MAX_CACHE_TIMEOUT_SECS {
        return Err(SettingsError::Invalid(format!(
            "cache.timeout_secs must be at most {}",
            MAX_CACHE_TIMEOUT_SECS
        )));
    }
    if config.watchlist.file.trim().is_empty() {
        return Err(SettingsError::Invalid("watchlist.file is empty".into()));
    }
    Ok(())
}

/// Render a configuration as TOML.
pub fn to_toml(config: &AppConfig) -> Result<String, SettingsError> {
    Ok(toml::to_string_pretty(config)?)
}
