//! Cached market data fetching.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};
use tracker_core::error::{DataError, NotFound, NotFoundReason};
use tracker_core::traits::{Clock, MarketDataProvider, SystemClock};
use tracker_core::types::{Period, PriceSeries, RawBar, StockInfo};

use crate::cache::{CacheKey, SeriesCache};

/// Slice a raw series down to the requested period.
///
/// Only `5y` and `10y` are sliced client-side; every other period was
/// fetched at exactly the requested window. Idempotent.
pub fn filter_to_period(series: &PriceSeries, period: Period, now: DateTime<Utc>) -> PriceSeries {
    match period.lookback_days() {
        Some(days) => {
            let cutoff = now - Duration::days(days);
            let filtered = series.since(cutoff.timestamp_millis());
            debug!(
                symbol = %series.symbol,
                %period,
                raw = series.len(),
                kept = filtered.len(),
                "Filtered series to lookback"
            );
            filtered
        }
        None => series.clone(),
    }
}

/// Resolves `(symbol, period)` requests to bar series through a cache.
///
/// The fetcher has no internal concurrency. `get_series` takes `&mut self`
/// so the check-fetch-store sequence is exclusive; share it behind a mutex.
pub struct MarketDataFetcher<P, C = SystemClock> {
    provider: P,
    cache: SeriesCache,
    clock: C,
}

impl<P: MarketDataProvider> MarketDataFetcher<P, SystemClock> {
    /// Create a fetcher over `provider` using the system clock.
    pub fn new(provider: P, cache: SeriesCache) -> Self {
        Self::with_clock(provider, cache, SystemClock)
    }
}

impl<P: MarketDataProvider, C: Clock> MarketDataFetcher<P, C> {
    /// Create a fetcher with an explicit clock.
    pub fn with_clock(provider: P, cache: SeriesCache, clock: C) -> Self {
        Self {
            provider,
            cache,
            clock,
        }
    }

    /// Get the bar series for `symbol` over `period`.
    ///
    /// Serves fresh cache entries without touching the provider. On a miss
    /// the provider is queried, the result cleaned and cached raw, and the
    /// filtered view returned. Every failure is reported as [`NotFound`].
    pub async fn get_series(&mut self, symbol: &str, period: Period) -> Result<PriceSeries, NotFound> {
        let key = CacheKey::new(symbol, period);
        let now = self.clock.now();

        debug!(symbol, %period, fetch_period = %key.fetch_period, "Requesting series");

        if let Some(raw) = self.cache.get_fresh(&key, now) {
            debug!(symbol, %period, "Using cached series");
            return Ok(filter_to_period(raw, period, now));
        }

        let raw = self.fetch_raw(symbol, period).await?;
        let filtered = filter_to_period(&raw, period, now);

        info!(
            symbol,
            %period,
            raw = raw.len(),
            filtered = filtered.len(),
            "Fetched series"
        );

        self.cache.put(key, raw, now);
        Ok(filtered)
    }

    /// Query the provider and clean the response.
    async fn fetch_raw(&self, symbol: &str, period: Period) -> Result<PriceSeries, NotFound> {
        // A symbol without a quoted price is not worth a bar request, but
        // the metadata endpoint is less reliable than the bar endpoint, so
        // a failed lookup only gets logged.
        match self.provider.metadata(symbol).await {
            Ok(meta) if !meta.is_resolvable() => {
                warn!(symbol, "No price data found, symbol may be delisted");
                return Err(NotFound::new(symbol, period, NotFoundReason::Unresolvable));
            }
            Ok(_) => {}
            Err(DataError::SymbolNotFound(_)) => {
                warn!(symbol, "Symbol not found by provider");
                return Err(NotFound::new(symbol, period, NotFoundReason::Unresolvable));
            }
            Err(e) => warn!(symbol, error = %e, "Metadata lookup failed, fetching bars anyway"),
        }

        let raw = self.fetch_bars(symbol, period).await.map_err(|e| {
            error!(symbol, %period, error = %e, "Error fetching bars");
            NotFound::new(symbol, period, NotFoundReason::Provider(e.to_string()))
        })?;

        let (series, dropped) = PriceSeries::from_raw(symbol, period, &raw);
        if dropped > 0 {
            warn!(symbol, %period, dropped, "Dropped bars without a positive close");
        }

        if series.is_empty() {
            warn!(symbol, %period, "No data available");
            return Err(NotFound::new(symbol, period, NotFoundReason::Empty));
        }

        Ok(series)
    }

    /// Request bars per the period's fetch plan.
    async fn fetch_bars(&self, symbol: &str, period: Period) -> Result<Vec<RawBar>, DataError> {
        let plan = period.fetch_plan();
        let bars = self
            .provider
            .history(symbol, plan.window, plan.interval)
            .await?;

        if bars.is_empty() && plan.fallback_to_default {
            debug!(symbol, %period, "Empty intraday result, retrying at default interval");
            return self.provider.history(symbol, plan.window, None).await;
        }

        Ok(bars)
    }

    /// Look up stock details.
    pub async fn stock_info(&self, symbol: &str) -> Result<StockInfo, DataError> {
        let meta = self.provider.metadata(symbol).await?;
        Ok(StockInfo::from_metadata(symbol, meta))
    }

    /// Look up stock details, falling back to defaults on failure.
    ///
    /// The fallback has `degraded` set so callers can tell it apart from a
    /// real answer.
    pub async fn stock_info_or_default(&self, symbol: &str) -> StockInfo {
        match self.stock_info(symbol).await {
            Ok(info) => info,
            Err(e) => {
                warn!(symbol, error = %e, "Stock info unavailable, using defaults");
                StockInfo::fallback(symbol)
            }
        }
    }

    /// Drop every cached series for `symbol`.
    pub fn clear_symbol(&mut self, symbol: &str) -> usize {
        let removed = self.cache.clear(symbol);
        info!(symbol, removed, "Cleared cached series");
        removed
    }

    /// Drop all cached series.
    pub fn clear_cache(&mut self) {
        let removed = self.cache.len();
        self.cache.clear_all();
        info!(removed, "Cleared all cached series");
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
