//! Market data fetching and caching.
//!
//! [`MarketDataFetcher`] resolves `(symbol, period)` requests against an
//! injected [`SeriesCache`], falling through to a [`MarketDataProvider`]
//! on a miss. [`YahooProvider`] is the production provider.
//!
//! [`MarketDataProvider`]: tracker_core::traits::MarketDataProvider

mod cache;
mod fetcher;
mod yahoo;

pub use cache::{CacheEntry, CacheKey, SeriesCache, DEFAULT_CACHE_TIMEOUT_SECS};
pub use fetcher::{filter_to_period, MarketDataFetcher};
pub use yahoo::{YahooConfig, YahooProvider, DEFAULT_BASE_URL};
