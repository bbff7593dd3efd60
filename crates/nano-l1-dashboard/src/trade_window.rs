/*
[INPUT]:  Trade batches from `trades` events, in arrival order
[OUTPUT]: Bounded oldest-first trade history
[POS]:    Reducer state - trade tape window
[UPDATE]: When changing the window bound or eviction policy
*/

use std::collections::VecDeque;

use nano_l1_feed::Trade;

pub const TRADE_WINDOW_CAPACITY: usize = 200;

/// Most recent trades, oldest first. Once full, the oldest entries are evicted.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeWindow {
    trades: VecDeque<Trade>,
    capacity: usize,
}

impl TradeWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            trades: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a batch, then drop from the front until the bound holds.
    pub fn extend(&mut self, batch: &[Trade]) {
        self.trades.extend(batch.iter().cloned());
        let overflow = self.trades.len().saturating_sub(self.capacity);
        if overflow > 0 {
            self.trades.drain(..overflow);
        }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Trade> + ExactSizeIterator {
        self.trades.iter()
    }

    /// Up to `n` trades, newest first.
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &Trade> {
        self.trades.iter().rev().take(n)
    }
}

impl Default for TradeWindow {
    fn default() -> Self {
        Self::with_capacity(TRADE_WINDOW_CAPACITY)
    }
}
