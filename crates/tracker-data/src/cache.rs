//! Series caching.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracker_core::types::{Period, PriceSeries};

/// Default time a fetched series stays fresh.
pub const DEFAULT_CACHE_TIMEOUT_SECS: i64 = 300;

/// Cache key.
///
/// The requested period is part of the key even though `5y`, `10y` and
/// `max` share a fetch window: each request slices its own view of the raw
/// data and must never see another request's truncation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub fetch_period: Period,
    pub requested_period: Period,
}

impl CacheKey {
    /// Derive the key for a request.
    pub fn new(symbol: &str, period: Period) -> Self {
        Self {
            symbol: symbol.to_string(),
            fetch_period: period.fetch_period(),
            requested_period: period,
        }
    }
}

/// Raw fetched series and when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    /// Cleaned but unfiltered provider data
    pub raw: PriceSeries,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_stale(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.fetched_at >= timeout
    }
}

/// In-memory series cache with a fixed freshness timeout.
///
/// Stale entries are never evicted in the background; a lookup simply
/// ignores them and the next store overwrites them.
#[derive(Debug)]
pub struct SeriesCache {
    entries: HashMap<CacheKey, CacheEntry>,
    timeout: Duration,
}

impl SeriesCache {
    /// Create a new cache with the given timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            timeout,
        }
    }

    /// Get the raw series for `key` if it is still fresh at `now`.
    pub fn get_fresh(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<&PriceSeries> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_stale(now, self.timeout))
            .map(|entry| &entry.raw)
    }

    /// Store a raw series, replacing any previous entry for the key.
    pub fn put(&mut self, key: CacheKey, raw: PriceSeries, fetched_at: DateTime<Utc>) {
        let entry = CacheEntry {
            key: key.clone(),
            raw,
            fetched_at,
        };
        self.entries.insert(key, entry);
    }

    /// Clear every entry for a symbol. Returns how many were removed.
    pub fn clear(&mut self, symbol: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| k.symbol != symbol);
        before - self.entries.len()
    }

    /// Clear all cached data.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_CACHE_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::types::Bar;

    fn series(symbol: &str, period: Period) -> PriceSeries {
        PriceSeries::new(
            symbol,
            period,
            vec![Bar::new(1_000, 1.0, 1.0, 1.0, 1.0, 10.0)],
        )
    }

    #[test]
    fn test_multi_year_keys_are_distinct() {
        let five = CacheKey::new("AAPL", Period::Year5);
        let ten = CacheKey::new("AAPL", Period::Year10);
        let max = CacheKey::new("AAPL", Period::Max);

        assert_eq!(five.fetch_period, Period::Max);
        assert_eq!(ten.fetch_period, Period::Max);
        assert_ne!(five, ten);
        assert_ne!(ten, max);
    }

    #[test]
    fn test_fresh_and_stale() {
        let mut cache = SeriesCache::default();
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let key = CacheKey::new("AAPL", Period::Month6);
        cache.put(key.clone(), series("AAPL", Period::Month6), t0);

        assert!(cache.get_fresh(&key, t0 + Duration::seconds(299)).is_some());
        // Exactly at the timeout the entry is stale
        assert!(cache.get_fresh(&key, t0 + Duration::seconds(300)).is_none());
        // Stale entries stay until overwritten
        assert_eq!(cache.len(), 1);

        cache.put(key.clone(), series("AAPL", Period::Month6), t0 + Duration::seconds(400));
        assert_eq!(cache.len(), 1);
        assert!(cache.get_fresh(&key, t0 + Duration::seconds(450)).is_some());
    }

    #[test]
    fn test_clear_symbol_is_exact() {
        let mut cache = SeriesCache::default();
        let now = Utc::now();
        cache.put(CacheKey::new("AAPL", Period::Month6), series("AAPL", Period::Month6), now);
        cache.put(CacheKey::new("AAPL", Period::Year5), series("AAPL", Period::Year5), now);
        cache.put(CacheKey::new("AAPLX", Period::Month6), series("AAPLX", Period::Month6), now);

        assert_eq!(cache.clear("AAPL"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache
            .get_fresh(&CacheKey::new("AAPLX", Period::Month6), now)
            .is_some());

        cache.clear_all();
        assert!(cache.is_empty());
    }
}
