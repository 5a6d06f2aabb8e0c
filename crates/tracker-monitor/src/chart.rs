//! Chart panel data for a single symbol.
//!
//! Four panels are derived from one series: price with moving averages,
//! RSI, volume, and either the market-cap trend or price performance when
//! the share count is unknown.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracker_core::traits::Indicator;
use tracker_core::types::{Period, PriceSeries, StockInfo};
use tracker_indicators::{compute_rsi, RsiZone, Sma};

use crate::format::{format_market_cap, format_market_cap_axis, format_volume};
use crate::snapshot::RsiParams;

const SHORT_MA: usize = 20;
const LONG_MA: usize = 50;
const AXIS_TICKS: usize = 5;

/// Color hint for a volume bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeDirection {
    /// First bar, nothing to compare against
    Neutral,
    Up,
    Down,
}

/// Fourth panel contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValuePanel {
    /// Close times shares outstanding
    MarketCap {
        values: Vec<f64>,
        ma20: Option<Vec<Option<f64>>>,
        current: f64,
        /// Tick labels from the panel minimum to maximum
        axis_labels: Vec<String>,
    },
    /// Close as a percentage of the first close
    Performance { values: Vec<f64>, change_pct: f64 },
}

/// Everything needed to draw a symbol's chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub symbol: String,
    pub company_name: String,
    pub period: Period,
    /// Bar timestamps in milliseconds
    pub timestamps: Vec<i64>,
    pub closes: Vec<f64>,
    pub ma20: Option<Vec<Option<f64>>>,
    pub ma50: Option<Vec<Option<f64>>>,
    pub rsi: Vec<f64>,
    pub current_rsi: f64,
    pub rsi_zone: RsiZone,
    pub rsi_period: usize,
    pub volumes: Vec<f64>,
    pub volume_directions: Vec<VolumeDirection>,
    pub avg_volume: f64,
    pub current_volume: f64,
    pub volume_vs_avg_pct: f64,
    pub value_panel: ValuePanel,
    pub span_days: i64,
    /// `strftime` pattern for date-axis ticks
    pub axis_date_format: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ChartData {
    /// Derive chart data with the default RSI settings.
    pub fn build(
        symbol: &str,
        period: Period,
        series: &PriceSeries,
        info: &StockInfo,
    ) -> Option<Self> {
        Self::build_with(symbol, period, series, info, &RsiParams::default())
    }

    /// Derive chart data. Returns `None` for an empty series.
    pub fn build_with(
        symbol: &str,
        period: Period,
        series: &PriceSeries,
        info: &StockInfo,
        params: &RsiParams,
    ) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;

        let closes = series.closes();
        let volumes = series.volumes();

        let rsi = compute_rsi(&closes, params.period);
        let current_rsi = rsi.last().copied().unwrap_or(tracker_indicators::NEUTRAL_RSI);

        let avg_volume = volumes.iter().sum::<f64>() / volumes.len() as f64;
        let current_volume = last.volume;
        let volume_vs_avg_pct = if avg_volume > 0.0 {
            (current_volume / avg_volume - 1.0) * 100.0
        } else {
            0.0
        };

        let value_panel = if info.shares_outstanding > 0 {
            let shares = info.shares_outstanding as f64;
            let values: Vec<f64> = closes.iter().map(|c| c * shares).collect();
            let current = values.last().copied().unwrap_or(0.0);
            ValuePanel::MarketCap {
                ma20: moving_average(&values, SHORT_MA),
                axis_labels: market_cap_axis(&values),
                values,
                current,
            }
        } else {
            let base = first.close;
            let values: Vec<f64> = closes.iter().map(|c| c / base * 100.0).collect();
            let change_pct = values.last().map_or(0.0, |v| v - 100.0);
            ValuePanel::Performance { values, change_pct }
        };

        Some(Self {
            symbol: symbol.to_string(),
            company_name: info.company_name.clone(),
            period,
            timestamps: series.iter().map(|b| b.timestamp).collect(),
            ma20: moving_average(&closes, SHORT_MA),
            ma50: moving_average(&closes, LONG_MA),
            volume_directions: volume_directions(&closes),
            current_rsi,
            rsi_zone: params.zone(current_rsi),
            rsi_period: params.period,
            rsi,
            closes,
            volumes,
            avg_volume,
            current_volume,
            volume_vs_avg_pct,
            value_panel,
            span_days: series.span_days(),
            axis_date_format: axis_date_format(series.span_days()).to_string(),
            start_date: first.datetime().date_naive(),
            end_date: last.datetime().date_naive(),
        })
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let rule = "───────────────────────────────────────────────────────────\n";

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!(
            "  {} ({}) - {}\n",
            self.symbol, self.company_name, self.period
        ));
        s.push_str(&format!(
            "  {} points | {} to {} ({} days)\n",
            self.len(),
            self.start_date,
            self.end_date,
            self.span_days
        ));
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("PRICE\n");
        s.push_str(rule);
        let last_close = self.closes.last().copied().unwrap_or(0.0);
        s.push_str(&format!("  Close:               ${:.2}\n", last_close));
        if let Some(ma) = last_defined(&self.ma20) {
            s.push_str(&format!("  MA20:                ${:.2}\n", ma));
        }
        if let Some(ma) = last_defined(&self.ma50) {
            s.push_str(&format!("  MA50:                ${:.2}\n", ma));
        }
        s.push('\n');

        s.push_str(&format!("RSI ({}-period)\n", self.rsi_period));
        s.push_str(rule);
        s.push_str(&format!(
            "  Current:             {:.1} ({})\n",
            self.current_rsi, self.rsi_zone
        ));
        s.push('\n');

        s.push_str("VOLUME\n");
        s.push_str(rule);
        s.push_str(&format!(
            "  Current:             {} ({:+.0}% vs avg)\n",
            format_volume(self.current_volume),
            self.volume_vs_avg_pct
        ));
        s.push_str(&format!(
            "  Average:             {}\n",
            format_volume(self.avg_volume)
        ));
        s.push('\n');

        match &self.value_panel {
            ValuePanel::MarketCap {
                current,
                axis_labels,
                ..
            } => {
                s.push_str("MARKET CAP\n");
                s.push_str(rule);
                s.push_str(&format!(
                    "  Current:             {}\n",
                    format_market_cap(*current)
                ));
                if let (Some(low), Some(high)) = (axis_labels.first(), axis_labels.last()) {
                    s.push_str(&format!("  Range:               {} to {}\n", low, high));
                }
            }
            ValuePanel::Performance { change_pct, .. } => {
                s.push_str("PRICE PERFORMANCE\n");
                s.push_str(rule);
                s.push_str(&format!(
                    "  Since start:         {:+.1}%\n",
                    change_pct
                ));
            }
        }

        s
    }
}

/// Date label format suited to the span shown.
fn axis_date_format(span_days: i64) -> &'static str {
    if span_days > 365 * 2 {
        "%Y"
    } else if span_days > 90 {
        "%m/%y"
    } else {
        "%m/%d"
    }
}

/// Evenly spaced tick labels between the smallest and largest value.
fn market_cap_axis(values: &[f64]) -> Vec<String> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let step = (max - min) / (AXIS_TICKS - 1) as f64;
    (0..AXIS_TICKS)
        .map(|i| format_market_cap_axis(min + step * i as f64))
        .collect()
}

/// Aligned SMA, or `None` when the input is shorter than the window.
fn moving_average(values: &[f64], period: usize) -> Option<Vec<Option<f64>>> {
    if values.len() < period {
        return None;
    }
    Some(Sma::new(period).calculate(values))
}

fn volume_directions(closes: &[f64]) -> Vec<VolumeDirection> {
    let mut dirs = Vec::with_capacity(closes.len());
    for (i, close) in closes.iter().enumerate() {
        let dir = match i.checked_sub(1).map(|p| closes[p]) {
            None => VolumeDirection::Neutral,
            Some(prev) if *close >= prev => VolumeDirection::Up,
            Some(_) => VolumeDirection::Down,
        };
        dirs.push(dir);
    }
    dirs
}

fn last_defined(values: &Option<Vec<Option<f64>>>) -> Option<f64> {
    values.as_ref()?.last().copied().flatten()
}
