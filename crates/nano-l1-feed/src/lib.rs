/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public feed adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod error;
pub mod types;
pub mod ws;

pub use error::{DecodeError, FeedError, Result};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    CONNECT_TIMEOUT,
    ConnectionState,
    DEFAULT_ENDPOINT,
    EventHandler,
    FeedConnection,
    FeedEvent,
    decode_frame,
    parse_endpoint,
};
