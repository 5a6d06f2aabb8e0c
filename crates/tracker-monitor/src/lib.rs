//! Watchlist monitoring, reports and TUI dashboard.

pub mod chart;
mod dashboard;
pub mod format;
mod logging;
pub mod poller;
pub mod snapshot;
pub mod watchlist;

pub use chart::{ChartData, ValuePanel, VolumeDirection};
pub use dashboard::{Dashboard, DashboardState};
pub use logging::setup_logging;
pub use poller::{PollerConfig, ReloadRequest, SharedFetcher, WatchlistPoller};
pub use snapshot::{render_table, QuoteSnapshot, RsiParams, SnapshotRow};
pub use watchlist::{Watchlist, WatchlistError, DEFAULT_SYMBOLS};
