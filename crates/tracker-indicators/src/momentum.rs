//! Momentum indicators.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracker_core::traits::Indicator;

/// Default RSI lookback.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI value reported wherever the indicator is undefined.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Relative Strength Index (RSI), simple-moving-average variant.
///
/// Gains and losses are averaged with a trailing SMA rather than Wilder's
/// exponential smoothing. Output is aligned with the input and never
/// contains NaN: positions without enough history read as 50.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Mean of `values[end + 1 - period..=end]`.
    ///
    /// Summed from the slice each time so an all-zero window is exactly zero.
    fn window_mean(values: &[f64], end: usize, period: usize) -> f64 {
        values[end + 1 - period..=end].iter().sum::<f64>() / period as f64
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIOD)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![NEUTRAL_RSI; data.len()];
        if data.len() < self.period + 1 {
            return result;
        }

        // The first bar has no predecessor and counts as an unchanged close
        let mut gains = Vec::with_capacity(data.len());
        let mut losses = Vec::with_capacity(data.len());
        gains.push(0.0);
        losses.push(0.0);

        for i in 1..data.len() {
            let change = data[i] - data[i - 1];
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        for i in (self.period - 1)..data.len() {
            let avg_gain = Self::window_mean(&gains, i, self.period);
            let avg_loss = Self::window_mean(&losses, i, self.period);

            result[i] = if avg_loss == 0.0 {
                if avg_gain == 0.0 {
                    NEUTRAL_RSI
                } else {
                    100.0
                }
            } else {
                100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
            };
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// Compute the RSI series for `closes`.
pub fn compute_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    Rsi::new(period).calculate(closes)
}

/// Overbought/oversold classification of an RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub const OVERBOUGHT: f64 = 70.0;
    pub const OVERSOLD: f64 = 30.0;

    /// Classify with the standard 70/30 thresholds.
    pub fn classify(rsi: f64) -> Self {
        Self::classify_with(rsi, Self::OVERBOUGHT, Self::OVERSOLD)
    }

    /// Classify with custom thresholds. Both bounds are exclusive.
    pub fn classify_with(rsi: f64, overbought: f64, oversold: f64) -> Self {
        if rsi > overbought {
            RsiZone::Overbought
        } else if rsi < oversold {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RsiZone::Overbought => "Overbought",
            RsiZone::Oversold => "Oversold",
            RsiZone::Neutral => "Neutral",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_CLOSES: [f64; 16] = [
        44.0, 44.25, 44.5, 43.75, 44.5, 44.65, 45.0, 45.5, 45.25, 45.0, 45.5, 46.0, 45.75, 46.25,
        46.5, 46.0,
    ];

    #[test]
    fn test_rsi_short_input_is_neutral() {
        for len in 0..15 {
            let data: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
            let result = compute_rsi(&data, 14);
            assert_eq!(result.len(), len);
            assert!(result.iter().all(|v| *v == 50.0));
        }
    }

    #[test]
    fn test_rsi_reference_values() {
        let result = compute_rsi(&REFERENCE_CLOSES, 14);
        assert_eq!(result.len(), REFERENCE_CLOSES.len());

        // Leading window is neutral
        for value in &result[..13] {
            assert_eq!(*value, 50.0);
        }
        // Gains 3.75 / losses 1.5 over the first window
        assert!((result[13] - 500.0 / 7.0).abs() < 1e-6);
        assert!((result[14] - 800.0 / 11.0).abs() < 1e-6);
        assert!((result[15] - 1500.0 / 23.0).abs() < 1e-6);
    }

    #[test]
    fn test_rsi_bounded() {
        let data: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 8.0 + (i as f64 * 0.05).cos() * 3.0)
            .collect();

        let result = compute_rsi(&data, 14);
        assert_eq!(result.len(), data.len());
        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let data: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let result = compute_rsi(&data, 14);

        for value in &result[13..] {
            assert_eq!(*value, 100.0);
        }
    }

    #[test]
    fn test_rsi_all_losses() {
        let data: Vec<f64> = (1..=30).rev().map(|i| i as f64).collect();
        let result = compute_rsi(&data, 14);

        for value in &result[13..] {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    fn test_rsi_gains_after_losses_reach_exactly_100() {
        // Losses leave the window entirely once 14 rising bars have passed
        let mut data: Vec<f64> = vec![50.0, 49.0, 48.3, 47.9];
        data.extend((1..=20).map(|i| 47.9 + i as f64 * 0.1));
        let result = compute_rsi(&data, 14);

        assert_eq!(*result.last().unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_flat_prices_are_neutral() {
        let data = vec![10.0; 20];
        let result = compute_rsi(&data, 14);
        assert!(result.iter().all(|v| *v == 50.0));
    }

    #[test]
    fn test_rsi_indicator_trait() {
        let rsi = Rsi::default();
        assert_eq!(rsi.period(), 15);
        assert_eq!(rsi.name(), "RSI");
        assert!(!rsi.is_warmed_up(&REFERENCE_CLOSES[..14]));
        assert!(rsi.is_warmed_up(&REFERENCE_CLOSES));
    }

    #[test]
    fn test_rsi_zone() {
        assert_eq!(RsiZone::classify(75.0), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(70.0), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(30.0), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(12.0), RsiZone::Oversold);
        assert_eq!(RsiZone::classify_with(65.0, 60.0, 40.0), RsiZone::Overbought);
        assert_eq!(RsiZone::Oversold.to_string(), "Oversold");
    }
}
