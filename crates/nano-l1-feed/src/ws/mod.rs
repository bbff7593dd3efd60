/*
[INPUT]:  Feed endpoint configuration and inbound frames
[OUTPUT]: Typed feed events and connection lifecycle notifications
[POS]:    WebSocket layer - real-time feed transport
[UPDATE]: When adding new event types or changing connection logic
*/

pub mod client;
pub mod message;

pub use client::{
    CONNECT_TIMEOUT, ConnectionState, DEFAULT_ENDPOINT, EventHandler, FeedConnection, parse_endpoint,
};
pub use message::{BOOK_UPDATE_EVENT, FeedEvent, TRADES_EVENT, decode_binary_frame, decode_frame};
