//! Background watchlist refresh.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};
use tracker_core::traits::{Clock, MarketDataProvider, SystemClock};
use tracker_core::types::Period;
use tracker_data::MarketDataFetcher;

use crate::snapshot::{QuoteSnapshot, RsiParams, SnapshotRow};

/// Fetcher shared between the poller and interactive commands.
pub type SharedFetcher<P, C = SystemClock> = Arc<Mutex<MarketDataFetcher<P, C>>>;

/// Poller timing and RSI settings.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Pause between symbols within a round
    pub symbol_pause: Duration,
    /// Pause between rounds
    pub round_interval: Duration,
    /// Period fetched for each snapshot
    pub period: Period,
    pub rsi: RsiParams,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            symbol_pause: Duration::from_secs(2),
            round_interval: Duration::from_secs(30),
            period: Period::Month1,
            rsi: RsiParams::default(),
        }
    }
}

/// Cache reload asked for by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadRequest {
    /// Drop cached series for one symbol
    Symbol(String),
    /// Drop every cached series
    All,
}

/// Refreshes every watchlist symbol in sequence and publishes the table.
pub struct WatchlistPoller<P, C = SystemClock> {
    fetcher: SharedFetcher<P, C>,
    symbols: Vec<String>,
    config: PollerConfig,
    rows: watch::Sender<Vec<SnapshotRow>>,
    rounds: watch::Sender<u64>,
    reload: Option<mpsc::UnboundedReceiver<ReloadRequest>>,
}

impl<P: MarketDataProvider, C: Clock> WatchlistPoller<P, C> {
    /// Create a poller and the receiver its rows are published on.
    pub fn new(
        fetcher: SharedFetcher<P, C>,
        symbols: Vec<String>,
        config: PollerConfig,
    ) -> (Self, watch::Receiver<Vec<SnapshotRow>>) {
        let (tx, rx) = watch::channel(Vec::new());
        let poller = Self {
            fetcher,
            symbols,
            config,
            rows: tx,
            rounds: watch::Sender::new(0),
            reload: None,
        };
        (poller, rx)
    }

    /// Accept reload requests while running.
    ///
    /// A request clears the matching cache entries and starts the next
    /// round without waiting out the round interval.
    pub fn with_reload(mut self, reload: mpsc::UnboundedReceiver<ReloadRequest>) -> Self {
        self.reload = Some(reload);
        self
    }

    /// Receiver of the number of rounds completed by [`run`](Self::run).
    pub fn subscribe_rounds(&self) -> watch::Receiver<u64> {
        self.rounds.subscribe()
    }

    /// Clear the cache entries named by `request`.
    pub async fn apply_reload(&self, request: &ReloadRequest) {
        let mut fetcher = self.fetcher.lock().await;
        match request {
            ReloadRequest::Symbol(symbol) => {
                fetcher.clear_symbol(symbol);
            }
            ReloadRequest::All => fetcher.clear_cache(),
        }
    }

    /// Fetch and summarize one symbol.
    ///
    /// The fetcher lock is held for the whole lookup so a concurrent caller
    /// never issues a duplicate fetch for the same key.
    pub async fn refresh_symbol(&self, symbol: &str) -> SnapshotRow {
        let mut fetcher = self.fetcher.lock().await;

        let series = match fetcher.get_series(symbol, self.config.period).await {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol, error = %e, "Refresh failed");
                return SnapshotRow::error(symbol);
            }
        };
        let info = fetcher.stock_info_or_default(symbol).await;
        drop(fetcher);

        match QuoteSnapshot::build_with(symbol, &series, &info, Utc::now(), &self.config.rsi) {
            Some(snapshot) => SnapshotRow::Quote(snapshot),
            None => SnapshotRow::error(symbol),
        }
    }

    /// Run one refresh round, publishing after each symbol.
    ///
    /// Returns early without finishing the round when `shutdown` fires.
    pub async fn poll_round(&self, shutdown: &mut watch::Receiver<bool>) -> Vec<SnapshotRow> {
        let mut rows = self.rows.borrow().clone();
        if rows.len() != self.symbols.len() {
            rows = self.symbols.iter().map(|s| SnapshotRow::error(s)).collect();
        }

        for (i, symbol) in self.symbols.iter().enumerate() {
            if *shutdown.borrow() {
                break;
            }

            rows[i] = self.refresh_symbol(symbol).await;
            self.rows.send_replace(rows.clone());

            if i + 1 < self.symbols.len() && !self.config.symbol_pause.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.config.symbol_pause) => {}
                    _ = shutdown.changed() => {}
                }
            }
        }

        rows
    }

    /// Poll until `shutdown` is set to `true` or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut reload = self.reload.take();
        info!(
            symbols = self.symbols.len(),
            interval_secs = self.config.round_interval.as_secs(),
            "Watchlist poller started"
        );

        loop {
            let rows = self.poll_round(&mut shutdown).await;
            let failed = rows
                .iter()
                .filter(|r| matches!(r, SnapshotRow::Error { .. }))
                .count();
            debug!(rows = rows.len(), failed, "Refresh round complete");

            if *shutdown.borrow() {
                break;
            }
            self.rounds.send_modify(|n| *n += 1);

            tokio::select! {
                _ = tokio::time::sleep(self.config.round_interval) => {}
                Some(request) = next_reload(&mut reload) => {
                    info!(?request, "Reload requested");
                    self.apply_reload(&request).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Watchlist poller stopped");
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

/// Next reload request, or never when reloads are not wired up.
async fn next_reload(
    reload: &mut Option<mpsc::UnboundedReceiver<ReloadRequest>>,
) -> Option<ReloadRequest> {
    match reload {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracker_core::error::DataError;
    use tracker_core::types::{Interval, RawBar, SymbolMetadata};
    use tracker_data::SeriesCache;

    /// Serves a rising daily series for every symbol except `BAD`.
    #[derive(Default)]
    struct RisingProvider {
        history_calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for RisingProvider {
        async fn history(
            &self,
            symbol: &str,
            _window: Period,
            _interval: Option<Interval>,
        ) -> Result<Vec<RawBar>, DataError> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            if symbol == "BAD" {
                return Ok(vec![]);
            }
            let now = Utc::now().timestamp_millis();
            Ok((0..20)
                .map(|i| RawBar {
                    timestamp: now - (20 - i) * 86_400_000,
                    open: None,
                    high: None,
                    low: None,
                    close: Some(100.0 + i as f64),
                    volume: Some(1_000.0),
                })
                .collect())
        }

        async fn metadata(&self, _symbol: &str) -> Result<SymbolMetadata, DataError> {
            Ok(SymbolMetadata {
                regular_market_price: Some(119.0),
                ..Default::default()
            })
        }

        fn name(&self) -> &str {
            "rising"
        }
    }

    type Fixture = (
        WatchlistPoller<Arc<RisingProvider>>,
        Arc<RisingProvider>,
        watch::Receiver<Vec<SnapshotRow>>,
    );

    fn poller(symbols: &[&str]) -> Fixture {
        let provider = Arc::new(RisingProvider::default());
        let fetcher = MarketDataFetcher::new(provider.clone(), SeriesCache::default());
        let config = PollerConfig {
            symbol_pause: Duration::ZERO,
            round_interval: Duration::from_millis(10),
            ..Default::default()
        };
        let (poller, rx) = WatchlistPoller::new(
            Arc::new(Mutex::new(fetcher)),
            symbols.iter().map(|s| s.to_string()).collect(),
            config,
        );
        (poller, provider, rx)
    }

    async fn next_round(rounds: &mut watch::Receiver<u64>) {
        tokio::time::timeout(Duration::from_secs(5), rounds.changed())
            .await
            .expect("round did not complete")
            .unwrap();
    }

    #[tokio::test]
    async fn test_round_publishes_rows_in_order() {
        let (poller, _provider, rx) = poller(&["AAPL", "BAD", "MSFT"]);
        let (_tx, mut shutdown) = watch::channel(false);

        let rows = poller.poll_round(&mut shutdown).await;
        assert_eq!(rows.len(), 3);
        assert_eq!(*rx.borrow(), rows);

        match &rows[0] {
            SnapshotRow::Quote(q) => {
                assert_eq!(q.symbol, "AAPL");
                assert_eq!(q.price, 119.0);
                assert_eq!(q.rsi, 100.0);
            }
            other => panic!("expected quote, got {:?}", other),
        }
        assert_eq!(rows[1], SnapshotRow::error("BAD"));
        assert_eq!(rows[2].symbol(), "MSFT");
    }

    #[tokio::test]
    async fn test_second_round_hits_cache() {
        let (poller, provider, _rx) = poller(&["AAPL", "MSFT"]);
        let (_tx, mut shutdown) = watch::channel(false);

        poller.poll_round(&mut shutdown).await;
        poller.poll_round(&mut shutdown).await;
        assert_eq!(provider.history_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (poller, _provider, mut rx) = poller(&["AAPL"]);
        let (tx, shutdown) = watch::channel(false);

        let handle = tokio::spawn(poller.run(shutdown));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("poller did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_rounds_counted_when_complete() {
        let (poller, _provider, _rx) = poller(&["AAPL", "MSFT"]);
        let mut rounds = poller.subscribe_rounds();
        let (tx, shutdown) = watch::channel(false);

        let handle = tokio::spawn(poller.run(shutdown));
        next_round(&mut rounds).await;
        next_round(&mut rounds).await;
        assert!(*rounds.borrow() >= 2);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_interrupted_round_is_not_counted() {
        let (poller, _provider, _rx) = poller(&["AAPL"]);
        let rounds = poller.subscribe_rounds();
        let (_tx, shutdown) = watch::channel(true);

        poller.run(shutdown).await;
        assert_eq!(*rounds.borrow(), 0);
    }

    #[tokio::test]
    async fn test_reload_clears_cache_and_refreshes() {
        let (mut poller, provider, _rx) = poller(&["AAPL", "MSFT"]);
        poller.config.round_interval = Duration::from_secs(3600);
        let (reload_tx, reload_rx) = mpsc::unbounded_channel();
        let poller = poller.with_reload(reload_rx);
        let fetcher = poller.fetcher.clone();
        let mut rounds = poller.subscribe_rounds();
        let (tx, shutdown) = watch::channel(false);

        let handle = tokio::spawn(poller.run(shutdown));

        next_round(&mut rounds).await;
        assert_eq!(provider.history_calls.load(Ordering::SeqCst), 2);
        assert_eq!(fetcher.lock().await.cache().len(), 2);

        // Only the selected symbol is refetched
        reload_tx.send(ReloadRequest::Symbol("AAPL".into())).unwrap();
        next_round(&mut rounds).await;
        assert_eq!(provider.history_calls.load(Ordering::SeqCst), 3);

        reload_tx.send(ReloadRequest::All).unwrap();
        next_round(&mut rounds).await;
        assert_eq!(provider.history_calls.load(Ordering::SeqCst), 5);
        assert_eq!(*rounds.borrow(), 3);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_before_round_skips_symbols() {
        let (poller, provider, _rx) = poller(&["AAPL", "MSFT"]);
        let (_tx, mut shutdown) = watch::channel(true);

        let rows = poller.poll_round(&mut shutdown).await;
        assert_eq!(rows, vec![SnapshotRow::error("AAPL"), SnapshotRow::error("MSFT")]);
        assert_eq!(provider.history_calls.load(Ordering::SeqCst), 0);
    }
}
