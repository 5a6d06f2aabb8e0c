//! Core types and traits for the RSI tracker.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries, Period, Interval)
//! - Provider metadata and stock info types
//! - Core traits for indicators, market data providers, and clocks

pub mod types;
pub mod traits;
pub mod error;

pub use error::{DataError, NotFound, NotFoundReason};
pub use types::*;
pub use traits::*;
