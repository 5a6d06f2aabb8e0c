//! Market data provider trait.

use crate::error::DataError;
use crate::types::{Interval, Period, RawBar, SymbolMetadata};
use async_trait::async_trait;

/// Trait for the external market data provider.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch historical bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `window` - The provider-side window
    /// * `interval` - Bar granularity, `None` for the provider default
    ///
    /// # Returns
    /// Bars ordered from oldest to newest; may be empty
    async fn history(
        &self,
        symbol: &str,
        window: Period,
        interval: Option<Interval>,
    ) -> Result<Vec<RawBar>, DataError>;

    /// Fetch symbol metadata (quoted price, shares outstanding, name).
    async fn metadata(&self, symbol: &str) -> Result<SymbolMetadata, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: MarketDataProvider + ?Sized> MarketDataProvider for std::sync::Arc<T> {
    async fn history(
        &self,
        symbol: &str,
        window: Period,
        interval: Option<Interval>,
    ) -> Result<Vec<RawBar>, DataError> {
        (**self).history(symbol, window, interval).await
    }

    async fn metadata(&self, symbol: &str) -> Result<SymbolMetadata, DataError> {
        (**self).metadata(symbol).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
