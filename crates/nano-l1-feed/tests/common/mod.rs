/*
[INPUT]:  Frames scripted by a test
[OUTPUT]: In-process WebSocket feed server bound to a loopback port
[POS]:    Test infrastructure - shared across feed integration tests
[UPDATE]: When adding new server behaviours needed by tests
*/

//! Common test utilities for nano-l1-feed tests

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

enum ServerCommand {
    Send(Message),
    Close,
}

/// Single-client feed server. Frames are pushed by the test.
pub struct FeedServer {
    pub url: String,
    commands: mpsc::UnboundedSender<ServerCommand>,
    handle: JoinHandle<bool>,
}

impl FeedServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let (commands, mut command_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.expect("accept client");
            let mut ws = accept_async(tcp).await.expect("websocket handshake");

            loop {
                tokio::select! {
                    command = command_rx.recv() => match command {
                        Some(ServerCommand::Send(message)) => {
                            if ws.send(message).await.is_err() {
                                return false;
                            }
                        }
                        Some(ServerCommand::Close) | None => {
                            let _ = ws.close(None).await;
                            return false;
                        }
                    },
                    incoming = ws.next() => match incoming {
                        // Client initiated close.
                        Some(Ok(Message::Close(_))) => return true,
                        Some(Ok(_)) => {}
                        Some(Err(_)) | None => return false,
                    },
                }
            }
        });

        Self {
            url: format!("ws://{addr}/ws"),
            commands,
            handle,
        }
    }

    pub fn send_text(&self, text: &str) {
        self.send(Message::text(text));
    }

    pub fn send(&self, message: Message) {
        let _ = self.commands.send(ServerCommand::Send(message));
    }

    pub fn close(&self) {
        let _ = self.commands.send(ServerCommand::Close);
    }

    /// Wait for the server task; `true` when the client sent a close frame.
    pub async fn client_closed(self) -> bool {
        tokio::time::timeout(RECV_TIMEOUT, self.handle)
            .await
            .expect("server task timed out")
            .expect("server task panicked")
    }
}

/// Accepts TCP connections and holds them open without ever answering the
/// WebSocket upgrade.
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

pub fn book_update_frame(bid: f64, ask: f64) -> String {
    serde_json::json!({
        "eventType": "book_update",
        "data": {
            "bestBid": { "price": bid, "qty": 1.0 },
            "bestAsk": { "price": ask, "qty": 1.0 },
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
