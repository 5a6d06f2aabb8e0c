//! Technical indicators for the RSI tracker.
//!
//! - Moving averages (SMA) for price and market-cap overlays
//! - Momentum (RSI, simple-moving-average variant) and its zones
//!
//! Every indicator returns output aligned 1:1 with its input.

pub mod momentum;
pub mod moving_average;

pub use momentum::{compute_rsi, Rsi, RsiZone, DEFAULT_RSI_PERIOD, NEUTRAL_RSI};
pub use moving_average::Sma;
