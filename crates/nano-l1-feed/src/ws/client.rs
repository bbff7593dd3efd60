/*
[INPUT]:  Feed endpoint URL and a single event handler
[OUTPUT]: Decoded FeedEvent values delivered in receipt order, connection state notifications
[POS]:    WebSocket layer - transport adapter (connect, read loop, close)
[UPDATE]: When changing connection lifecycle, frame handling, or close semantics
*/

use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::message::{FeedEvent, decode_binary_frame, decode_frame};
use crate::error::{DecodeError, FeedError, Result};

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws";

/// Upper bound on TCP connect plus the WebSocket upgrade.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);
const EVENT_SAMPLE_LIMIT: usize = 3;
const UNKNOWN_LOG_LIMIT: usize = 3;
const DECODE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

static EVENT_SAMPLE_COUNT: AtomicUsize = AtomicUsize::new(0);
static UNKNOWN_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);
static DECODE_FAIL_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Callback invoked once per decoded frame, in receipt order.
pub type EventHandler = Box<dyn FnMut(FeedEvent) + Send + 'static>;

/// Lifecycle of the underlying socket. Diagnostic only; never feeds the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
    Errored { message: String },
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

/// Validate a feed endpoint; only `ws://` and `wss://` URLs are accepted.
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|err| FeedError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(FeedError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

/// One open feed connection.
///
/// Frames are not read until a handler is registered with [`FeedConnection::on_event`].
/// There is no automatic reconnection: once the socket ends, callers connect again.
#[derive(Debug)]
pub struct FeedConnection {
    endpoint: Url,
    stream: Option<WsStream>,
    state_tx: watch::Sender<ConnectionState>,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
    closed: bool,
}

impl FeedConnection {
    /// Open a connection to the feed endpoint, giving up after [`CONNECT_TIMEOUT`].
    pub async fn connect(endpoint: &str) -> Result<Self> {
        Self::connect_with_timeout(endpoint, CONNECT_TIMEOUT).await
    }

    pub async fn connect_with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        let (stream, _response) = tokio::time::timeout(timeout, connect_async(endpoint.as_str()))
            .await
            .map_err(|_| {
                warn!(endpoint = %endpoint, ?timeout, "feed connect timed out");
                FeedError::Timeout {
                    endpoint: endpoint.to_string(),
                    after: timeout,
                }
            })?
            .map_err(|err| FeedError::connect(endpoint.as_str(), err))?;
        info!(endpoint = %endpoint, "feed connected");

        let (state_tx, _rx) = watch::channel(ConnectionState::Open);

        Ok(Self {
            endpoint,
            stream: Some(stream),
            state_tx,
            shutdown: CancellationToken::new(),
            worker: None,
            closed: false,
        })
    }

    /// Subscribe to connection lifecycle changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Register the event handler and start delivering frames.
    ///
    /// Only one handler may be registered per connection.
    pub fn on_event<H>(&mut self, handler: H) -> Result<()>
    where
        H: FnMut(FeedEvent) + Send + 'static,
    {
        if self.closed {
            return Err(FeedError::Closed);
        }
        let stream = self
            .stream
            .take()
            .ok_or(FeedError::HandlerAlreadyRegistered)?;

        let reader = FrameReader {
            endpoint: self.endpoint.to_string(),
            handler: Box::new(handler),
            state_tx: self.state_tx.clone(),
            shutdown: self.shutdown.clone(),
        };
        self.worker = Some(tokio::spawn(reader.run(stream)));
        Ok(())
    }

    /// Close the connection. Idempotent.
    ///
    /// When this returns the read loop has exited, so the handler will not be
    /// invoked again.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.shutdown.cancel();

        if let Some(mut stream) = self.stream.take() {
            match tokio::time::timeout(CLOSE_TIMEOUT, stream.close(None)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => debug!(error = %err, "feed close handshake failed"),
                Err(_) => debug!("feed close handshake timed out"),
            }
            self.state_tx.send_replace(ConnectionState::Closed);
        }

        if let Some(worker) = self.worker.take()
            && let Err(err) = worker.await
        {
            warn!(error = %err, "feed reader task ended abnormally");
        }

        info!(endpoint = %self.endpoint, "feed connection closed");
    }
}

impl Drop for FeedConnection {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct FrameReader {
    endpoint: String,
    handler: EventHandler,
    state_tx: watch::Sender<ConnectionState>,
    shutdown: CancellationToken,
}

impl FrameReader {
    async fn run(mut self, mut stream: WsStream) {
        let final_state = loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    match tokio::time::timeout(CLOSE_TIMEOUT, stream.close(None)).await {
                        Ok(Ok(())) => {}
                        Ok(Err(err)) => debug!(error = %err, "feed close handshake failed"),
                        Err(_) => debug!("feed close handshake timed out"),
                    }
                    break ConnectionState::Closed;
                }
                incoming = stream.next() => {
                    match incoming {
                        Some(Ok(WsMessage::Close(frame))) => {
                            info!(endpoint = %self.endpoint, ?frame, "feed closed by peer");
                            break ConnectionState::Closed;
                        }
                        Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
                        Some(Ok(message)) => self.dispatch(&message),
                        Some(Err(err)) => {
                            warn!(endpoint = %self.endpoint, error = %err, "feed transport error");
                            break ConnectionState::Errored { message: err.to_string() };
                        }
                        None => {
                            info!(endpoint = %self.endpoint, "feed stream ended");
                            break ConnectionState::Closed;
                        }
                    }
                }
            }
        };

        self.state_tx.send_replace(final_state);
    }

    fn dispatch(&mut self, message: &WsMessage) {
        let decoded = match message {
            WsMessage::Text(text) => decode_frame(text.as_str()),
            WsMessage::Binary(bytes) => decode_binary_frame(bytes),
            _ => return,
        };

        match decoded {
            Ok(event) => {
                if event.is_known() {
                    log_event_sample_once(&event);
                } else {
                    log_unknown_event_once(event.event_type());
                }
                (self.handler)(event);
            }
            Err(err) => log_decode_fail_once(&err, &frame_text(message)),
        }
    }
}

fn frame_text(message: &WsMessage) -> Cow<'_, str> {
    match message {
        WsMessage::Text(text) => Cow::Borrowed(text.as_str()),
        WsMessage::Binary(bytes) => String::from_utf8_lossy(bytes),
        _ => Cow::Borrowed(""),
    }
}

fn log_event_sample_once(event: &FeedEvent) {
    let count = EVENT_SAMPLE_COUNT.fetch_add(1, Ordering::Relaxed);
    if count >= EVENT_SAMPLE_LIMIT {
        return;
    }

    match event {
        FeedEvent::Trades(trades) => {
            info!(
                sample_index = count + 1,
                sample_limit = EVENT_SAMPLE_LIMIT,
                event_type = event.event_type(),
                batch_len = trades.len(),
                "feed event sample"
            );
        }
        _ => {
            info!(
                sample_index = count + 1,
                sample_limit = EVENT_SAMPLE_LIMIT,
                event_type = event.event_type(),
                "feed event sample"
            );
        }
    }
}

fn log_unknown_event_once(event_type: &str) {
    let count = UNKNOWN_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < UNKNOWN_LOG_LIMIT {
        info!(
            sample_index = count + 1,
            sample_limit = UNKNOWN_LOG_LIMIT,
            event_type,
            "feed event type unrecognized"
        );
    } else {
        debug!(event_type, "feed event type unrecognized");
    }
}

fn log_decode_fail_once(err: &DecodeError, raw: &str) {
    let count = DECODE_FAIL_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < DECODE_FAIL_LOG_LIMIT {
        warn!(
            sample_index = count + 1,
            sample_limit = DECODE_FAIL_LOG_LIMIT,
            error = %err,
            bytes = raw.len(),
            "feed frame dropped"
        );
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = DECODE_FAIL_LOG_LIMIT,
            error = %err,
            message = %preview,
            "feed frame dropped"
        );
    } else {
        debug!(error = %err, bytes = raw.len(), "feed frame dropped");
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
