//! Wall-clock source.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Cache staleness and period slicing read the time through this trait so
/// tests can move the clock forward.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
