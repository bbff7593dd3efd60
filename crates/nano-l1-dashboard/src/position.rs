/*
[INPUT]:  Trade batches from `trades` events
[OUTPUT]: Net position and append-only realized P&L series
[POS]:    Reducer state - position/P&L fold
[UPDATE]: When changing trade attribution or the P&L fold
*/

use nano_l1_feed::Trade;

/// Position and P&L under the placeholder attribution where every observed
/// trade is treated as a fill of the local account.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionState {
    position: f64,
    pnl_series: Vec<f64>,
}

impl PositionState {
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Oldest first; never empty.
    pub fn pnl_series(&self) -> &[f64] {
        &self.pnl_series
    }

    pub fn current_pnl(&self) -> f64 {
        self.pnl_series.last().copied().unwrap_or_default()
    }

    /// Fold a batch in arrival order and append a single P&L point for it.
    /// An empty batch changes nothing.
    pub fn apply_batch(&mut self, batch: &[Trade]) {
        if batch.is_empty() {
            return;
        }

        let (position, pnl) = batch
            .iter()
            .fold((self.position, self.current_pnl()), |(position, pnl), trade| {
                (position + trade.signed_qty(), pnl + trade.cash_flow())
            });

        self.position = position;
        self.pnl_series.push(pnl);
    }
}

impl Default for PositionState {
    fn default() -> Self {
        Self {
            position: 0.0,
            pnl_series: vec![0.0],
        }
    }
}
