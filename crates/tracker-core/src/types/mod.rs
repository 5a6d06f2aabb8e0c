//! Core data types for the RSI tracker.

mod metadata;
mod ohlcv;
mod period;

pub use metadata::{StockInfo, SymbolMetadata};
pub use ohlcv::{Bar, PriceSeries, RawBar};
pub use period::{FetchPlan, Interval, Period};
