/*
[INPUT]:  Snapshot and feed status watch channels, shutdown token
[OUTPUT]: Periodic structured log summaries of the dashboard
[POS]:    Headless presentation for non-interactive runs
[UPDATE]: When changing the summary fields
*/

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::session::{FeedStatus, SnapshotReceiver};
use crate::snapshot::DashboardSnapshot;

/// Logs one summary line per `report_interval` and every feed status change.
pub async fn run_headless(
    mut snapshots: SnapshotReceiver,
    mut status: watch::Receiver<FeedStatus>,
    report_interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(report_interval);
    let mut status_open = true;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let snapshot = snapshots.borrow_and_update().clone();
                log_summary(&snapshot);
            }
            changed = status.changed(), if status_open => match changed {
                Ok(()) => {
                    let label = status.borrow_and_update().label();
                    info!(status = %label, "feed status changed");
                }
                Err(_) => status_open = false,
            },
        }
    }
}

fn log_summary(snapshot: &DashboardSnapshot) {
    let Some(book) = snapshot.book.as_ref() else {
        info!(
            trades = snapshot.trade_count,
            position = snapshot.position,
            pnl = snapshot.pnl,
            "waiting for stream"
        );
        return;
    };

    let last_trade = snapshot.recent_trades.first();
    info!(
        bid = book.best_bid.price,
        bid_qty = book.best_bid.qty,
        ask = book.best_ask.price,
        ask_qty = book.best_ask.qty,
        spread = snapshot.spread(),
        last_price = ?book.last_trade_price,
        last_side = ?last_trade.map(|trade| trade.aggressor_side),
        trades = snapshot.trade_count,
        position = snapshot.position,
        pnl = snapshot.pnl,
        mark_to_market = ?snapshot.mark_to_market(),
        "dashboard summary"
    );
}
