//! Chart periods and bar intervals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested chart window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Period {
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "5d")]
    Day5,
    #[serde(rename = "1mo")]
    Month1,
    #[serde(rename = "3mo")]
    Month3,
    /// Six months of daily bars
    #[serde(rename = "6mo")]
    #[default]
    Month6,
    #[serde(rename = "1y")]
    Year1,
    #[serde(rename = "2y")]
    Year2,
    /// Sliced client-side out of a `max` fetch
    #[serde(rename = "5y")]
    Year5,
    /// Sliced client-side out of a `max` fetch
    #[serde(rename = "10y")]
    Year10,
    /// All available history
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// The window actually requested from the provider.
    ///
    /// Providers return coarse, inconsistent bars for custom multi-year
    /// windows, so `5y` and `10y` fetch the full history and are sliced
    /// afterwards.
    pub fn fetch_period(&self) -> Period {
        match self {
            Period::Year5 | Period::Year10 => Period::Max,
            other => *other,
        }
    }

    /// Client-side lookback applied after fetching, in days.
    pub fn lookback_days(&self) -> Option<i64> {
        match self {
            Period::Year5 => Some(1825),
            Period::Year10 => Some(3650),
            _ => None,
        }
    }

    /// How bars for this period are requested from the provider.
    pub fn fetch_plan(&self) -> FetchPlan {
        match self {
            Period::Day1 => FetchPlan {
                window: *self,
                interval: Some(Interval::Minute5),
                fallback_to_default: true,
            },
            Period::Day5 => FetchPlan {
                window: *self,
                interval: Some(Interval::Hour1),
                fallback_to_default: true,
            },
            _ => FetchPlan {
                window: self.fetch_period(),
                interval: None,
                fallback_to_default: false,
            },
        }
    }

    /// Get all selectable periods.
    pub fn all() -> &'static [Period] {
        &[
            Period::Day1,
            Period::Day5,
            Period::Month1,
            Period::Month3,
            Period::Month6,
            Period::Year1,
            Period::Year2,
            Period::Year5,
            Period::Year10,
            Period::Max,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day1 => "1d",
            Period::Day5 => "5d",
            Period::Month1 => "1mo",
            Period::Month3 => "3mo",
            Period::Month6 => "6mo",
            Period::Year1 => "1y",
            Period::Year2 => "2y",
            Period::Year5 => "5y",
            Period::Year10 => "10y",
            Period::Max => "max",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(Period::Day1),
            "5d" => Ok(Period::Day5),
            "1mo" => Ok(Period::Month1),
            "3mo" => Ok(Period::Month3),
            "6mo" => Ok(Period::Month6),
            "1y" => Ok(Period::Year1),
            "2y" => Ok(Period::Year2),
            "5y" => Ok(Period::Year5),
            "10y" => Ok(Period::Year10),
            "max" => Ok(Period::Max),
            _ => Err(format!("Invalid period: {}", s)),
        }
    }
}

/// Bar granularity requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "1d")]
    Daily,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute5 => "5m",
            Interval::Hour1 => "1h",
            Interval::Daily => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provider request derived from a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Window passed to the provider
    pub window: Period,
    /// Explicit granularity, `None` for the provider default
    pub interval: Option<Interval>,
    /// Retry once at default granularity when the first request is empty
    pub fallback_to_default: bool,
}
