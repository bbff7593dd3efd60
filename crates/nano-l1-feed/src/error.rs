/*
[INPUT]:  Error sources (endpoint parsing, WebSocket transport, frame decoding)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for the feed crate
[UPDATE]: When adding new error sources or improving error messages
*/

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::types::InvalidField;

/// Main error type for the feed adapter
#[derive(Error, Debug)]
pub enum FeedError {
    /// Endpoint is not a usable ws:// or wss:// URL
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Opening the WebSocket failed
    #[error("Connecting to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    /// TCP connect or the WebSocket upgrade did not finish in time
    #[error("Connecting to {endpoint} timed out after {after:?}")]
    Timeout { endpoint: String, after: Duration },

    /// An event handler is already attached to this connection
    #[error("Event handler already registered")]
    HandlerAlreadyRegistered,

    /// The connection was closed before the operation
    #[error("Connection closed")]
    Closed,

    /// A frame could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl FeedError {
    /// Check if the caller may reasonably retry by reconnecting
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FeedError::Connect { .. } | FeedError::Timeout { .. } | FeedError::Closed
        )
    }

    pub(crate) fn connect(endpoint: &str, source: tungstenite::Error) -> Self {
        FeedError::Connect {
            endpoint: endpoint.to_string(),
            source: Box::new(source),
        }
    }
}

/// Failure to turn one inbound frame into a typed event.
///
/// Decode errors never leave the adapter: the frame is logged and dropped.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("frame is not valid UTF-8")]
    NonUtf8,

    #[error("malformed envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("malformed {event_type} payload: {source}")]
    Payload {
        event_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {event_type} field {}: {}", .invalid.field, .invalid.value)]
    InvalidField {
        event_type: &'static str,
        invalid: InvalidField,
    },
}

/// Result type alias for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;
