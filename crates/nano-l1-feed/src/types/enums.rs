/*
[INPUT]:  Feed wire schema (aggressorSide values)
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - enum definitions for feed events
[UPDATE]: When the feed schema adds new enumerated fields
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of the market order that initiated a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    /// +1 for buys, -1 for sells.
    pub fn sign(self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
