//! Watch command implementation.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info};
use tracker_config::AppConfig;
use tracker_core::traits::MarketDataProvider;
use tracker_monitor::{
    render_table, Dashboard, DashboardState, PollerConfig, ReloadRequest, WatchlistPoller,
};

use super::{build_fetcher, load_watchlist, rsi_params};
use crate::cli::WatchArgs;

pub async fn run(args: WatchArgs, config: &AppConfig) -> Result<()> {
    let watchlist = load_watchlist(config);
    if watchlist.is_empty() {
        anyhow::bail!("Watchlist is empty. Add symbols with `watchlist add <SYMBOL>`");
    }

    let fetcher = build_fetcher(config)?;
    let provider_name = fetcher.provider().name().to_string();
    let interval_secs = args.interval.unwrap_or(config.refresh.interval_secs);

    let rsi = rsi_params(config);
    let poller_config = PollerConfig {
        symbol_pause: Duration::from_millis(config.refresh.symbol_pause_ms),
        round_interval: Duration::from_secs(interval_secs),
        rsi,
        ..Default::default()
    };
    let (reload_tx, reload_rx) = mpsc::unbounded_channel::<ReloadRequest>();
    let (poller, rows) = WatchlistPoller::new(
        Arc::new(Mutex::new(fetcher)),
        watchlist.symbols().to_vec(),
        poller_config,
    );
    let poller = poller.with_reload(reload_rx);
    let mut rounds = poller.subscribe_rounds();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(poller.run(shutdown_rx));
    info!(symbols = watchlist.len(), "Watching");

    if args.plain {
        // One table per completed round
        loop {
            tokio::select! {
                changed = rounds.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = rows.borrow().clone();
                    println!("{}", render_table(&snapshot));
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    } else {
        let dashboard = Dashboard::new(250);
        tokio::task::spawn_blocking(move || {
            dashboard.run(
                || DashboardState {
                    rows: rows.borrow().clone(),
                    provider_name: provider_name.clone(),
                    refresh_secs: interval_secs,
                    rsi,
                },
                |request| {
                    if reload_tx.send(request).is_err() {
                        debug!("Poller stopped, reload dropped");
                    }
                },
            )
        })
        .await
        .context("Dashboard task panicked")?
        .context("Dashboard terminal error")?;
    }

    shutdown_tx.send_replace(true);
    handle.await.context("Poller task panicked")?;
    Ok(())
}
