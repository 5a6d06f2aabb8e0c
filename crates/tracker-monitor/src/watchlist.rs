//! Persistent watchlist of ticker symbols.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Symbols used when no watchlist file exists.
pub const DEFAULT_SYMBOLS: [&str; 5] = ["AAPL", "TSLA", "MSFT", "GOOGL", "NVDA"];

/// Watchlist errors.
#[derive(Error, Debug)]
pub enum WatchlistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid watchlist file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} already in watchlist")]
    Duplicate(String),

    #[error("Symbol is empty")]
    EmptySymbol,
}

/// Ordered, de-duplicated list of upper-cased symbols stored as a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist {
    symbols: Vec<String>,
}

impl Watchlist {
    /// Build from symbols, normalizing case and dropping repeats.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self { symbols: Vec::new() };
        for symbol in symbols {
            // Blank and repeated entries in a hand-edited file are skipped
            let _ = list.add(symbol.as_ref());
        }
        list
    }

    /// Load from `path`, or fall back to `defaults` if the file is missing
    /// or unreadable.
    pub fn load_or<S: AsRef<str>>(path: &Path, defaults: &[S]) -> Self {
        match Self::load(path) {
            Ok(list) => {
                debug!(path = %path.display(), count = list.len(), "Loaded watchlist");
                list
            }
            Err(WatchlistError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::new(defaults)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read watchlist, using defaults");
                Self::new(defaults)
            }
        }
    }

    /// Load from `path`.
    pub fn load(path: &Path) -> Result<Self, WatchlistError> {
        let contents = std::fs::read_to_string(path)?;
        let symbols: Vec<String> = serde_json::from_str(&contents)?;
        Ok(Self::new(symbols))
    }

    /// Write the list to `path` as a JSON array.
    pub fn save(&self, path: &Path) -> Result<(), WatchlistError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), count = self.len(), "Saved watchlist");
        Ok(())
    }

    /// Append a symbol. Returns the normalized symbol.
    pub fn add(&mut self, symbol: &str) -> Result<String, WatchlistError> {
        let symbol = normalize(symbol);
        if symbol.is_empty() {
            return Err(WatchlistError::EmptySymbol);
        }
        if self.contains(&symbol) {
            return Err(WatchlistError::Duplicate(symbol));
        }
        self.symbols.push(symbol.clone());
        Ok(symbol)
    }

    /// Remove a symbol. Returns `true` if it was present.
    pub fn remove(&mut self, symbol: &str) -> bool {
        let symbol = normalize(symbol);
        let before = self.symbols.len();
        self.symbols.retain(|s| *s != symbol);
        self.symbols.len() != before
    }

    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = normalize(symbol);
        self.symbols.iter().any(|s| *s == symbol)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOLS)
    }
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
