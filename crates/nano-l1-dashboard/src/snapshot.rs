/*
[INPUT]:  DashboardState after each applied event
[OUTPUT]: Immutable, view-sized DashboardSnapshot for the presentation layer
[POS]:    Shared read-only contract between reducer and views
[UPDATE]: When views need new derived figures
*/

use nano_l1_feed::{BookSnapshot, Trade};

use crate::reducer::DashboardState;

/// Number of trades and P&L points the views display.
pub const VIEW_DEPTH: usize = 30;

/// Copy of the state the views are allowed to see.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub book: Option<BookSnapshot>,
    /// Newest first.
    pub recent_trades: Vec<Trade>,
    /// Oldest first.
    pub pnl_tail: Vec<f64>,
    pub pnl: f64,
    pub position: f64,
    pub trade_count: usize,
    pub pnl_points: usize,
}

impl DashboardSnapshot {
    pub fn from_state(state: &DashboardState) -> Self {
        let series = state.pnl_series();
        let tail_start = series.len().saturating_sub(VIEW_DEPTH);

        Self {
            book: state.book().cloned(),
            recent_trades: state.trades().latest(VIEW_DEPTH).cloned().collect(),
            pnl_tail: series[tail_start..].to_vec(),
            pnl: state.current_pnl(),
            position: state.position(),
            trade_count: state.trades().len(),
            pnl_points: series.len(),
        }
    }

    /// Ask minus bid, or zero unless both sides carry a positive price.
    pub fn spread(&self) -> f64 {
        match &self.book {
            Some(book) if book.best_bid.price > 0.0 && book.best_ask.price > 0.0 => {
                book.best_ask.price - book.best_bid.price
            }
            _ => 0.0,
        }
    }

    /// Cash plus position valued at the last trade price.
    pub fn mark_to_market(&self) -> Option<f64> {
        let last = self.book.as_ref()?.last_trade_price?;
        Some(self.pnl + self.position * last)
    }
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self::from_state(&DashboardState::default())
    }
}
