/*
[INPUT]:  Feed wire schema (book_update and trades payloads)
[OUTPUT]: Typed Rust structs with serialization support and boundary validation
[POS]:    Data layer - payload models shared by decoder and reducer
[UPDATE]: When the feed schema changes or new payload fields are added
*/

use serde::{Deserialize, Serialize};

use super::enums::Side;

/// One side of the top of book. `qty == 0` means no resting interest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub qty: f64,
}

impl PriceLevel {
    pub fn new(price: f64, qty: f64) -> Self {
        Self { price, qty }
    }
}

/// Top-of-book snapshot carried by a `book_update` event.
///
/// A side missing from the payload is defaulted to `{0, 0}`; snapshots are
/// always replaced wholesale, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSnapshot {
    #[serde(default)]
    pub best_bid: PriceLevel,
    #[serde(default)]
    pub best_ask: PriceLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_trade_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

/// A single execution reported by the feed. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub price: f64,
    pub qty: f64,
    pub aggressor_side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Engine timestamp in nanoseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maker_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taker_order_id: Option<String>,
}

impl Trade {
    pub fn new(price: f64, qty: f64, aggressor_side: Side) -> Self {
        Self {
            price,
            qty,
            aggressor_side,
            symbol: None,
            ts: None,
            maker_order_id: None,
            taker_order_id: None,
        }
    }

    /// Signed quantity from the local account's point of view (buys are positive).
    pub fn signed_qty(&self) -> f64 {
        self.aggressor_side.sign() * self.qty
    }

    /// Cash flow of the fill: buys pay `price * qty`, sells receive it.
    pub fn cash_flow(&self) -> f64 {
        -self.aggressor_side.sign() * self.price * self.qty
    }
}

/// Field-level check failed after the payload parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidField {
    pub field: &'static str,
    pub value: f64,
}

pub(crate) trait Validate {
    fn validate(&self) -> Result<(), InvalidField>;
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InvalidField> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InvalidField { field, value })
    }
}

impl Validate for BookSnapshot {
    fn validate(&self) -> Result<(), InvalidField> {
        non_negative("bestBid.price", self.best_bid.price)?;
        non_negative("bestBid.qty", self.best_bid.qty)?;
        non_negative("bestAsk.price", self.best_ask.price)?;
        non_negative("bestAsk.qty", self.best_ask.qty)?;
        if let Some(last) = self.last_trade_price {
            non_negative("lastTradePrice", last)?;
        }
        Ok(())
    }
}

impl Validate for Trade {
    fn validate(&self) -> Result<(), InvalidField> {
        non_negative("price", self.price)?;
        if !(self.qty.is_finite() && self.qty > 0.0) {
            return Err(InvalidField {
                field: "qty",
                value: self.qty,
            });
        }
        Ok(())
    }
}
