//! Error types for the RSI tracker.

use thiserror::Error;

use crate::types::Period;

/// Market data provider errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Why a series request resolved to no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Provider metadata carries no current or market price.
    Unresolvable,
    /// The fetch returned no usable bars after cleaning.
    Empty,
    /// The provider failed while fetching bars.
    Provider(String),
}

impl std::fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotFoundReason::Unresolvable => write!(f, "symbol may be delisted or invalid"),
            NotFoundReason::Empty => write!(f, "no usable bars"),
            NotFoundReason::Provider(msg) => write!(f, "provider error: {}", msg),
        }
    }
}

/// The only failure a series request surfaces to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No data available for {symbol} ({period}): {reason}")]
pub struct NotFound {
    pub symbol: String,
    pub period: Period,
    pub reason: NotFoundReason,
}

impl NotFound {
    pub fn new(symbol: &str, period: Period, reason: NotFoundReason) -> Self {
        Self {
            symbol: symbol.to_string(),
            period,
            reason,
        }
    }
}
