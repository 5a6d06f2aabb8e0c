//! Core traits for the RSI tracker.

mod clock;
mod indicator;
mod provider;

pub use clock::{Clock, SystemClock};
pub use indicator::Indicator;
pub use provider::MarketDataProvider;
