/*
[INPUT]:  Frames scripted by a test
[OUTPUT]: In-process WebSocket feed server that serves clients one after another
[POS]:    Test infrastructure - shared across dashboard integration tests
[UPDATE]: When adding new server behaviours needed by tests
*/

//! Common test utilities for nano-l1-dashboard tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

enum ServerCommand {
    Send(Message),
    Close,
}

/// Feed server that accepts clients sequentially. Commands queue until a
/// client is connected and always go to the current one.
pub struct FeedServer {
    pub url: String,
    commands: mpsc::UnboundedSender<ServerCommand>,
    connections: Arc<AtomicUsize>,
    client_closes: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl FeedServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let (commands, mut command_rx) = mpsc::unbounded_channel();
        let connections = Arc::new(AtomicUsize::new(0));
        let client_closes = Arc::new(AtomicUsize::new(0));

        let handle = {
            let connections = Arc::clone(&connections);
            let client_closes = Arc::clone(&client_closes);
            tokio::spawn(async move {
                loop {
                    let Ok((tcp, _)) = listener.accept().await else {
                        return;
                    };
                    let Ok(mut ws) = accept_async(tcp).await else {
                        continue;
                    };
                    connections.fetch_add(1, Ordering::SeqCst);

                    loop {
                        tokio::select! {
                            command = command_rx.recv() => match command {
                                Some(ServerCommand::Send(message)) => {
                                    if ws.send(message).await.is_err() {
                                        break;
                                    }
                                }
                                Some(ServerCommand::Close) => {
                                    let _ = ws.close(None).await;
                                    break;
                                }
                                None => return,
                            },
                            incoming = ws.next() => match incoming {
                                Some(Ok(Message::Close(_))) => {
                                    client_closes.fetch_add(1, Ordering::SeqCst);
                                    break;
                                }
                                Some(Ok(_)) => {}
                                Some(Err(_)) | None => break,
                            },
                        }
                    }
                }
            })
        };

        Self {
            url: format!("ws://{addr}/ws"),
            commands,
            connections,
            client_closes,
            handle,
        }
    }

    pub fn send_text(&self, text: &str) {
        let _ = self
            .commands
            .send(ServerCommand::Send(Message::text(text)));
    }

    /// Close the current client connection from the server side.
    pub fn close_client(&self) {
        let _ = self.commands.send(ServerCommand::Close);
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn client_closes(&self) -> usize {
        self.client_closes.load(Ordering::SeqCst)
    }

    /// Poll a server counter until it reaches `expected`.
    pub async fn wait_until(&self, expected: usize, counter: fn(&FeedServer) -> usize) {
        tokio::time::timeout(RECV_TIMEOUT, async {
            while counter(self) < expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("server counter did not reach expected value");
    }
}

impl Drop for FeedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Address nothing listens on.
pub async fn refused_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind probe listener");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("ws://{addr}/ws")
}

/// Accepts TCP connections and holds them without answering the WebSocket
/// upgrade, so clients stay stuck in the handshake.
pub async fn start_stalled_listener() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stalled listener");
    let addr = listener.local_addr().expect("stalled listener addr");
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((tcp, _)) = listener.accept().await {
            held.push(tcp);
        }
    });
    (format!("ws://{addr}/ws"), handle)
}

/// Wait until the watched value satisfies `predicate` and return a copy.
pub async fn wait_for<T, F>(rx: &mut watch::Receiver<T>, predicate: F) -> T
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    tokio::time::timeout(RECV_TIMEOUT, rx.wait_for(predicate))
        .await
        .expect("timed out waiting for watch value")
        .expect("watch sender dropped")
        .clone()
}

pub fn book_update_frame(bid: f64, ask: f64) -> String {
    serde_json::json!({
        "eventType": "book_update",
        "data": {
            "bestBid": { "price": bid, "qty": 1.0 },
            "bestAsk": { "price": ask, "qty": 1.0 },
            "lastTradePrice": ask,
        }
    })
    .to_string()
}

pub fn trades_frame(trades: &[(f64, f64, &str)]) -> String {
    let data: Vec<_> = trades
        .iter()
        .map(|(price, qty, side)| {
            serde_json::json!({ "price": price, "qty": qty, "aggressorSide": side })
        })
        .collect();
    serde_json::json!({ "eventType": "trades", "data": data }).to_string()
}
