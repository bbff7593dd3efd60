/*
[INPUT]:  Raw WebSocket frame text ({ "eventType": ..., "data": ... })
[OUTPUT]: Typed FeedEvent values, payload shape validated at the boundary
[POS]:    WebSocket layer - frame decoding and validation
[UPDATE]: When adding new event types or changing the envelope format
*/

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;
use crate::types::models::Validate;
use crate::types::{BookSnapshot, Trade};

pub const BOOK_UPDATE_EVENT: &str = "book_update";
pub const TRADES_EVENT: &str = "trades";

/// Decoded feed event. Unrecognized event types are kept as `Unknown` so the
/// reducer can treat them as no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    BookUpdate(BookSnapshot),
    Trades(Vec<Trade>),
    Unknown { event_type: String },
}

impl FeedEvent {
    pub fn event_type(&self) -> &str {
        match self {
            FeedEvent::BookUpdate(_) => BOOK_UPDATE_EVENT,
            FeedEvent::Trades(_) => TRADES_EVENT,
            FeedEvent::Unknown { event_type } => event_type,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FeedEvent::Unknown { .. })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    event_type: String,
    #[serde(default)]
    data: Value,
}

/// Decode one text frame into a typed event.
pub fn decode_frame(text: &str) -> Result<FeedEvent, DecodeError> {
    let envelope: Envelope = serde_json::from_str(text).map_err(DecodeError::Envelope)?;

    match envelope.event_type.as_str() {
        BOOK_UPDATE_EVENT => {
            let book: BookSnapshot = decode_payload(BOOK_UPDATE_EVENT, envelope.data)?;
            book.validate().map_err(|invalid| DecodeError::InvalidField {
                event_type: BOOK_UPDATE_EVENT,
                invalid,
            })?;
            Ok(FeedEvent::BookUpdate(book))
        }
        TRADES_EVENT => {
            // The engine sends `[]` for no fills; treat an absent or null batch the same way.
            let trades: Vec<Trade> = if envelope.data.is_null() {
                Vec::new()
            } else {
                decode_payload(TRADES_EVENT, envelope.data)?
            };
            for trade in &trades {
                trade.validate().map_err(|invalid| DecodeError::InvalidField {
                    event_type: TRADES_EVENT,
                    invalid,
                })?;
            }
            Ok(FeedEvent::Trades(trades))
        }
        _ => Ok(FeedEvent::Unknown {
            event_type: envelope.event_type,
        }),
    }
}

/// Decode a binary frame; the feed only ever sends UTF-8 JSON.
pub fn decode_binary_frame(bytes: &[u8]) -> Result<FeedEvent, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::NonUtf8)?;
    decode_frame(text)
}

fn decode_payload<T: DeserializeOwned>(
    event_type: &'static str,
    data: Value,
) -> Result<T, DecodeError> {
    serde_json::from_value(data).map_err(|source| DecodeError::Payload { event_type, source })
}
