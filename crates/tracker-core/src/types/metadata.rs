//! Symbol metadata and the caller-facing stock info derived from it.

use serde::{Deserialize, Serialize};

/// Metadata as reported by the market data provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolMetadata {
    /// Latest traded price
    pub current_price: Option<f64>,
    /// Regular-session market price
    pub regular_market_price: Option<f64>,
    pub shares_outstanding: Option<u64>,
    pub market_cap: Option<u64>,
    /// Company long name
    pub long_name: Option<String>,
}

impl SymbolMetadata {
    /// Price used to decide whether the symbol resolves at all.
    pub fn market_price(&self) -> Option<f64> {
        self.current_price.or(self.regular_market_price)
    }

    /// A symbol without any quoted price is treated as delisted or invalid.
    pub fn is_resolvable(&self) -> bool {
        self.market_price().is_some()
    }
}

/// Stock details for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    pub symbol: String,
    pub company_name: String,
    pub current_price: Option<f64>,
    pub shares_outstanding: u64,
    pub market_cap: u64,
    /// The lookup failed and these are fallback defaults
    pub degraded: bool,
}

impl StockInfo {
    /// Build from provider metadata.
    pub fn from_metadata(symbol: &str, meta: SymbolMetadata) -> Self {
        Self {
            symbol: symbol.to_string(),
            current_price: meta.market_price(),
            company_name: meta.long_name.unwrap_or_else(|| symbol.to_string()),
            shares_outstanding: meta.shares_outstanding.unwrap_or(0),
            market_cap: meta.market_cap.unwrap_or(0),
            degraded: false,
        }
    }

    /// Defaults used when the metadata lookup fails.
    pub fn fallback(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            company_name: symbol.to_string(),
            current_price: None,
            shares_outstanding: 0,
            market_cap: 0,
            degraded: true,
        }
    }
}
