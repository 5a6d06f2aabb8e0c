//! Per-symbol quote snapshots for the watchlist table.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracker_core::types::{PriceSeries, StockInfo};
use tracker_indicators::{compute_rsi, RsiZone, DEFAULT_RSI_PERIOD, NEUTRAL_RSI};

use crate::format::{format_signed_money, format_signed_pct};

/// RSI period and zone thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiParams {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl RsiParams {
    pub fn zone(&self, rsi: f64) -> RsiZone {
        RsiZone::classify_with(rsi, self.overbought, self.oversold)
    }
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: DEFAULT_RSI_PERIOD,
            overbought: RsiZone::OVERBOUGHT,
            oversold: RsiZone::OVERSOLD,
        }
    }
}

/// Latest price, change and RSI for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_pct: f64,
    pub rsi: f64,
    pub zone: RsiZone,
    pub updated: DateTime<Utc>,
}

impl QuoteSnapshot {
    /// Build a snapshot with the standard 14-period RSI and 70/30 zones.
    pub fn build(
        symbol: &str,
        series: &PriceSeries,
        info: &StockInfo,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        Self::build_with(symbol, series, info, now, &RsiParams::default())
    }

    /// Build a snapshot. Returns `None` for an empty series.
    ///
    /// The quoted price wins over the last close when the provider has one.
    pub fn build_with(
        symbol: &str,
        series: &PriceSeries,
        info: &StockInfo,
        now: DateTime<Utc>,
        params: &RsiParams,
    ) -> Option<Self> {
        let last = series.last()?;
        let price = info.current_price.unwrap_or(last.close);
        let previous_close = match series.len() {
            n if n > 1 => series.get(n - 2).map_or(price, |b| b.close),
            _ => price,
        };

        let change = price - previous_close;
        let change_pct = if previous_close != 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };

        let rsi = compute_rsi(&series.closes(), params.period)
            .last()
            .copied()
            .unwrap_or(NEUTRAL_RSI);

        Some(Self {
            symbol: symbol.to_string(),
            price,
            previous_close,
            change,
            change_pct,
            rsi,
            zone: params.zone(rsi),
            updated: now,
        })
    }
}

/// One row of the watchlist table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SnapshotRow {
    Quote(QuoteSnapshot),
    Error { symbol: String },
}

impl SnapshotRow {
    pub fn error(symbol: &str) -> Self {
        SnapshotRow::Error {
            symbol: symbol.to_string(),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            SnapshotRow::Quote(q) => &q.symbol,
            SnapshotRow::Error { symbol } => symbol,
        }
    }

    /// Table cells: symbol, price, change, change %, RSI, status, updated.
    pub fn cells(&self) -> [String; 7] {
        match self {
            SnapshotRow::Quote(q) => [
                q.symbol.clone(),
                format!("${:.2}", q.price),
                format_signed_money(q.change),
                format_signed_pct(q.change_pct),
                format!("{:.1}", q.rsi),
                q.zone.to_string(),
                q.updated.with_timezone(&Local).format("%H:%M:%S").to_string(),
            ],
            SnapshotRow::Error { symbol } => [
                symbol.clone(),
                "Error".to_string(),
                "N/A".to_string(),
                "N/A".to_string(),
                "N/A".to_string(),
                "N/A".to_string(),
                "Error".to_string(),
            ],
        }
    }
}

/// Column headers matching [`SnapshotRow::cells`].
pub const TABLE_HEADERS: [&str; 7] = [
    "Symbol", "Price", "Change", "Change %", "RSI", "Status", "Updated",
];

/// Render rows as a plain text table.
pub fn render_table(rows: &[SnapshotRow]) -> String {
    const WIDTHS: [usize; 7] = [8, 12, 10, 10, 6, 11, 9];

    let mut s = String::new();
    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(WIDTHS)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    };

    s.push_str(&line(&TABLE_HEADERS));
    s.push('\n');
    s.push_str(&"─".repeat(WIDTHS.iter().sum::<usize>() + WIDTHS.len() - 1));
    s.push('\n');
    for row in rows {
        let cells = row.cells();
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        s.push_str(&line(&refs));
        s.push('\n');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::types::{Bar, Period};

    fn series(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 86_400_000, c, c, c, c, 1_000.0))
            .collect();
        PriceSeries::new("AAPL", Period::Month1, bars)
    }

    fn info(price: Option<f64>) -> StockInfo {
        let mut info = StockInfo::fallback("AAPL");
        info.current_price = price;
        info.degraded = false;
        info
    }

    #[test]
    fn test_change_from_previous_close() {
        let snap = QuoteSnapshot::build("AAPL", &series(&[100.0, 104.0]), &info(None), Utc::now())
            .unwrap();
        assert_eq!(snap.price, 104.0);
        assert_eq!(snap.previous_close, 100.0);
        assert!((snap.change - 4.0).abs() < 1e-12);
        assert!((snap.change_pct - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_quoted_price_wins() {
        let snap = QuoteSnapshot::build(
            "AAPL",
            &series(&[100.0, 104.0]),
            &info(Some(102.0)),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(snap.price, 102.0);
        assert!((snap.change - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_bar_has_no_change() {
        let snap =
            QuoteSnapshot::build("AAPL", &series(&[50.0]), &info(None), Utc::now()).unwrap();
        assert_eq!(snap.change, 0.0);
        assert_eq!(snap.change_pct, 0.0);
        // Too short for RSI
        assert_eq!(snap.rsi, NEUTRAL_RSI);
        assert_eq!(snap.zone, RsiZone::Neutral);
    }

    #[test]
    fn test_rising_series_is_overbought() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let snap = QuoteSnapshot::build("AAPL", &series(&closes), &info(None), Utc::now()).unwrap();
        assert_eq!(snap.rsi, 100.0);
        assert_eq!(snap.zone, RsiZone::Overbought);
    }

    #[test]
    fn test_empty_series() {
        assert!(QuoteSnapshot::build("AAPL", &series(&[]), &info(None), Utc::now()).is_none());
    }

    #[test]
    fn test_error_row_cells() {
        let row = SnapshotRow::error("XYZ");
        assert_eq!(row.symbol(), "XYZ");
        let cells = row.cells();
        assert_eq!(cells[1], "Error");
        assert_eq!(cells[4], "N/A");
    }

    #[test]
    fn test_render_table() {
        let snap = QuoteSnapshot::build("AAPL", &series(&[100.0, 99.0]), &info(None), Utc::now())
            .unwrap();
        let table = render_table(&[SnapshotRow::Quote(snap), SnapshotRow::error("BAD")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Symbol"));
        assert!(lines[2].contains("$99.00"));
        assert!(lines[2].contains("$-1.00"));
        assert!(lines[3].starts_with("BAD"));
    }
}
