/*
[INPUT]:  Feed endpoint, reconnect policy, shutdown token
[OUTPUT]: Latest DashboardSnapshot via `watch` + feed status notifications
[POS]:    Data layer - owns the reducer state and drives one feed connection at a time
[UPDATE]: When changing connection supervision, backoff, or teardown semantics
*/

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use nano_l1_feed::{ConnectionState, FeedConnection, FeedError, FeedEvent};

use crate::config::ReconnectConfig;
use crate::reducer::DashboardState;
use crate::snapshot::DashboardSnapshot;

pub type SnapshotReceiver = watch::Receiver<Arc<DashboardSnapshot>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Idle,
    Connecting,
    Connected,
    Disconnected {
        retry_count: u32,
        reason: Option<String>,
    },
    Stopped,
}

impl FeedStatus {
    pub fn label(&self) -> String {
        match self {
            FeedStatus::Idle => "idle".to_string(),
            FeedStatus::Connecting => "connecting".to_string(),
            FeedStatus::Connected => "connected".to_string(),
            FeedStatus::Disconnected {
                retry_count,
                reason,
            } => match reason {
                Some(reason) if *retry_count > 0 => {
                    format!("disconnected (retry {retry_count}): {reason}")
                }
                Some(reason) => format!("disconnected: {reason}"),
                None => "disconnected".to_string(),
            },
            FeedStatus::Stopped => "stopped".to_string(),
        }
    }
}

/// Owns the derived state and the feed connection feeding it.
///
/// Views only ever see `Arc<DashboardSnapshot>` copies published after each
/// applied event.
#[derive(Debug)]
pub struct DashboardSession {
    endpoint: String,
    reconnect: ReconnectConfig,
    state: Arc<Mutex<DashboardState>>,
    snapshot_tx: watch::Sender<Arc<DashboardSnapshot>>,
    status_tx: watch::Sender<FeedStatus>,
    connection: Option<FeedConnection>,
}

impl DashboardSession {
    pub fn new(endpoint: impl Into<String>, reconnect: ReconnectConfig) -> Self {
        let (snapshot_tx, _rx) = watch::channel(Arc::new(DashboardSnapshot::default()));
        let (status_tx, _rx) = watch::channel(FeedStatus::Idle);

        Self {
            endpoint: endpoint.into(),
            reconnect,
            state: Arc::new(Mutex::new(DashboardState::default())),
            snapshot_tx,
            status_tx,
            connection: None,
        }
    }

    pub fn subscribe_snapshots(&self) -> SnapshotReceiver {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<FeedStatus> {
        self.status_tx.subscribe()
    }

    /// Open a connection and start applying its events.
    ///
    /// Any previous connection is closed first.
    pub async fn connect(&mut self) -> Result<watch::Receiver<ConnectionState>, FeedError> {
        self.close().await;

        let mut connection = FeedConnection::connect(&self.endpoint).await?;
        let connection_state = connection.connection_state();

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        connection.on_event(move |event| apply_and_publish(&state, &snapshot_tx, &event))?;

        self.connection = Some(connection);
        Ok(connection_state)
    }

    /// Close the current connection, if any. No event is applied after this returns.
    pub async fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close().await;
        }
    }

    /// Drop all derived state and publish the empty snapshot.
    pub fn reset(&self) {
        let snapshot = {
            let mut state = lock_state(&self.state);
            *state = DashboardState::default();
            DashboardSnapshot::from_state(&state)
        };
        self.snapshot_tx.send_replace(Arc::new(snapshot));
    }

    /// Connect and keep the dashboard fed until `shutdown` fires.
    ///
    /// The connection is closed on every exit path.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut retry_count: u32 = 0;

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            self.status_tx.send_replace(FeedStatus::Connecting);
            info!(endpoint = %self.endpoint, "connecting to feed");

            let attempt = tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!(endpoint = %self.endpoint, "shutdown while connecting");
                    break;
                }
                attempt = self.connect() => attempt,
            };

            let reason = match attempt {
                Ok(mut connection_state) => {
                    retry_count = 0;
                    self.status_tx.send_replace(FeedStatus::Connected);

                    let ended = tokio::select! {
                        _ = shutdown.cancelled() => None,
                        ended = wait_for_disconnect(&mut connection_state) => Some(ended),
                    };
                    self.close().await;

                    let Some(ended) = ended else {
                        break;
                    };
                    warn!(endpoint = %self.endpoint, state = ?ended, "feed disconnected");
                    match ended {
                        ConnectionState::Errored { message } => Some(message),
                        _ => Some("connection closed".to_string()),
                    }
                }
                Err(err) => {
                    retry_count = retry_count.saturating_add(1);
                    warn!(endpoint = %self.endpoint, retry_count, error = %err, "feed connect failed");
                    Some(err.to_string())
                }
            };

            self.status_tx.send_replace(FeedStatus::Disconnected {
                retry_count,
                reason,
            });

            if !self.reconnect.enabled {
                info!("reconnection disabled; showing last known state");
                shutdown.cancelled().await;
                break;
            }

            if retry_count >= self.reconnect.max_retries {
                warn!(
                    retry_count,
                    max_retries = self.reconnect.max_retries,
                    "feed gave up reconnecting"
                );
                shutdown.cancelled().await;
                break;
            }

            if !self.reconnect.resume_state {
                debug!("reinitializing dashboard state before reconnect");
                self.reset();
            }

            let backoff = backoff_duration(retry_count.max(1));
            info!(retry_count, ?backoff, "reconnecting to feed after backoff");
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(backoff) => {}
            }
        }

        self.close().await;
        self.status_tx.send_replace(FeedStatus::Stopped);
        info!("dashboard session stopped");
    }
}

fn apply_and_publish(
    state: &Mutex<DashboardState>,
    snapshot_tx: &watch::Sender<Arc<DashboardSnapshot>>,
    event: &FeedEvent,
) {
    let snapshot = {
        let mut guard = lock_state(state);
        let current = std::mem::take(&mut *guard);
        *guard = current.apply(event);
        if !event.is_known() {
            return;
        }
        DashboardSnapshot::from_state(&guard)
    };
    snapshot_tx.send_replace(Arc::new(snapshot));
}

fn lock_state(state: &Mutex<DashboardState>) -> std::sync::MutexGuard<'_, DashboardState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn wait_for_disconnect(
    connection_state: &mut watch::Receiver<ConnectionState>,
) -> ConnectionState {
    match connection_state.wait_for(|state| !state.is_open()).await {
        Ok(state) => state.clone(),
        Err(_) => ConnectionState::Closed,
    }
}

fn backoff_duration(retry_count: u32) -> Duration {
    let exp = retry_count.saturating_sub(1).min(63);
    let secs = 1u64 << exp;
    Duration::from_secs(secs.min(30))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nano_l1_feed::{Side, Trade};

    #[test]
    fn backoff_clamps_at_30s() {
        assert_eq!(backoff_duration(1), Duration::from_secs(1));
        assert_eq!(backoff_duration(2), Duration::from_secs(2));
        assert_eq!(backoff_duration(3), Duration::from_secs(4));
        assert_eq!(backoff_duration(5), Duration::from_secs(16));
        assert_eq!(backoff_duration(6), Duration::from_secs(30));
        assert_eq!(backoff_duration(64), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn apply_and_publish_updates_watchers() {
        let session = DashboardSession::new("ws://localhost:1/ws", ReconnectConfig::default());
        let mut rx = session.subscribe_snapshots();

        apply_and_publish(
            &session.state,
            &session.snapshot_tx,
            &FeedEvent::Trades(vec![Trade::new(100.0, 2.0, Side::Buy)]),
        );

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.position, 2.0);
        assert_eq!(snapshot.pnl_tail, vec![0.0, -200.0]);
    }

    #[tokio::test]
    async fn unknown_events_publish_nothing() {
        let session = DashboardSession::new("ws://localhost:1/ws", ReconnectConfig::default());
        let rx = session.subscribe_snapshots();

        apply_and_publish(
            &session.state,
            &session.snapshot_tx,
            &FeedEvent::Unknown {
                event_type: "heartbeat".to_string(),
            },
        );

        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn reset_publishes_empty_snapshot() {
        let session = DashboardSession::new("ws://localhost:1/ws", ReconnectConfig::default());
        apply_and_publish(
            &session.state,
            &session.snapshot_tx,
            &FeedEvent::Trades(vec![Trade::new(1.0, 1.0, Side::Sell)]),
        );
        let mut rx = session.subscribe_snapshots();

        session.reset();

        rx.changed().await.unwrap();
        assert_eq!(**rx.borrow(), DashboardSnapshot::default());
    }

    #[test]
    fn status_labels() {
        assert_eq!(FeedStatus::Connected.label(), "connected");
        let status = FeedStatus::Disconnected {
            retry_count: 2,
            reason: Some("refused".to_string()),
        };
        assert_eq!(status.label(), "disconnected (retry 2): refused");
    }
}
