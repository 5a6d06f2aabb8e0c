//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Period;

/// Compact OHLCV bar.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Bar exactly as a provider reported it, before validation.
///
/// Providers leave gaps (halted sessions, the in-progress candle) as nulls,
/// and some omit the volume column entirely.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawBar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// Validate into a [`Bar`].
    ///
    /// Returns `None` when the close is missing, non-finite, or not
    /// positive. Missing volume becomes zero; missing open/high/low fall
    /// back to the close.
    pub fn clean(&self) -> Option<Bar> {
        let close = self.close.filter(|c| c.is_finite() && *c > 0.0)?;
        Some(Bar::new(
            self.timestamp,
            self.open.unwrap_or(close),
            self.high.unwrap_or(close),
            self.low.unwrap_or(close),
            close,
            self.volume.unwrap_or(0.0),
        ))
    }
}

/// Time-ordered bar series for one symbol and period.
///
/// Bars are strictly increasing by timestamp and every close is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Requested period the series answers
    pub period: Period,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series from already validated bars.
    ///
    /// Bars are sorted by timestamp; for duplicate timestamps the last bar
    /// wins.
    pub fn new(symbol: impl Into<String>, period: Period, bars: Vec<Bar>) -> Self {
        let mut bars: Vec<Bar> = bars
            .into_iter()
            .filter(|b| b.close.is_finite() && b.close > 0.0)
            .collect();
        bars.sort_by_key(|b| b.timestamp);

        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            period,
            bars: deduped,
        }
    }

    /// Validate raw provider bars into a series.
    ///
    /// Also returns how many bars were dropped for a missing or
    /// non-positive close.
    pub fn from_raw(symbol: impl Into<String>, period: Period, raw: &[RawBar]) -> (Self, usize) {
        let bars: Vec<Bar> = raw.iter().filter_map(RawBar::clean).collect();
        let dropped = raw.len() - bars.len();
        (Self::new(symbol, period, bars), dropped)
    }

    /// Keep only bars at or after `cutoff_ms`.
    pub fn since(&self, cutoff_ms: i64) -> Self {
        let start = self.bars.partition_point(|b| b.timestamp < cutoff_ms);
        Self {
            symbol: self.symbol.clone(),
            period: self.period,
            bars: self.bars[start..].to_vec(),
        }
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Whole days between the first and last bar.
    pub fn span_days(&self) -> i64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => (last.datetime() - first.datetime()).num_days(),
            _ => 0,
        }
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(timestamp: i64, close: Option<f64>, volume: Option<f64>) -> RawBar {
        RawBar {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    #[test]
    fn test_raw_bar_cleaning() {
        assert!(raw(1, None, Some(10.0)).clean().is_none());
        assert!(raw(1, Some(0.0), Some(10.0)).clean().is_none());
        assert!(raw(1, Some(-3.0), Some(10.0)).clean().is_none());
        assert!(raw(1, Some(f64::NAN), Some(10.0)).clean().is_none());

        let bar = raw(1, Some(10.0), None).clean().unwrap();
        assert_eq!(bar.volume, 0.0);

        let partial = RawBar {
            timestamp: 5,
            close: Some(12.5),
            ..Default::default()
        };
        let bar = partial.clean().unwrap();
        assert_eq!(bar.open, 12.5);
        assert_eq!(bar.high, 12.5);
        assert_eq!(bar.low, 12.5);
    }

    #[test]
    fn test_from_raw_drops_and_orders() {
        let input = vec![
            raw(3_000, Some(103.0), Some(1.0)),
            raw(1_000, Some(101.0), Some(1.0)),
            raw(2_000, None, Some(1.0)),
            raw(4_000, Some(-1.0), Some(1.0)),
            raw(1_000, Some(100.5), Some(2.0)),
        ];
        let (series, dropped) = PriceSeries::from_raw("AAPL", Period::Month1, &input);

        assert_eq!(dropped, 2);
        assert_eq!(series.len(), 2);
        let timestamps: Vec<i64> = series.iter().map(|b| b.timestamp).collect();
        assert_eq!(timestamps, vec![1_000, 3_000]);
        // Last duplicate wins
        assert_eq!(series.get(0).unwrap().close, 100.5);
    }

    #[test]
    fn test_since_cutoff() {
        let bars = (1..=5)
            .map(|i| Bar::new(i * 1_000, 1.0, 1.0, 1.0, i as f64, 0.0))
            .collect();
        let series = PriceSeries::new("MSFT", Period::Year5, bars);

        let tail = series.since(3_000);
        assert_eq!(tail.closes(), vec![3.0, 4.0, 5.0]);
        assert_eq!(tail.since(3_000), tail);
        assert!(series.since(10_000).is_empty());
    }

    #[test]
    fn test_series_extractions() {
        let series = PriceSeries::new(
            "AAPL",
            Period::Day5,
            vec![
                Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0),
                Bar::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0),
            ],
        );

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.volumes(), vec![1000.0, 2000.0]);
        assert_eq!(series.last().unwrap().timestamp, 2);
    }

    #[test]
    fn test_span_days() {
        let day_ms = 86_400_000;
        let series = PriceSeries::new(
            "AAPL",
            Period::Month1,
            vec![
                Bar::new(0, 1.0, 1.0, 1.0, 1.0, 0.0),
                Bar::new(30 * day_ms, 1.0, 1.0, 1.0, 1.0, 0.0),
            ],
        );
        assert_eq!(series.span_days(), 30);
        assert_eq!(PriceSeries::new("X", Period::Day1, vec![]).span_days(), 0);
    }
}
