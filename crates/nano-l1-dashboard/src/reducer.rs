/*
[INPUT]:  Previous DashboardState + one decoded FeedEvent
[OUTPUT]: Next DashboardState (book, trade window, position, P&L series)
[POS]:    Core - streaming state reducer, pure and I/O-free
[UPDATE]: When adding event types or changing per-event rules
*/

use nano_l1_feed::{BookSnapshot, FeedEvent};

use crate::position::PositionState;
use crate::trade_window::TradeWindow;

/// Derived dashboard state. Mutated only through [`DashboardState::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    book: Option<BookSnapshot>,
    trades: TradeWindow,
    position_state: PositionState,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the state.
    ///
    /// `book_update` replaces the book wholesale, a non-empty `trades` batch
    /// extends the window and appends exactly one P&L point, and everything
    /// else (including an empty batch) leaves the state untouched.
    #[must_use]
    pub fn apply(mut self, event: &FeedEvent) -> Self {
        match event {
            FeedEvent::BookUpdate(book) => {
                self.book = Some(book.clone());
            }
            FeedEvent::Trades(batch) if batch.is_empty() => {}
            FeedEvent::Trades(batch) => {
                self.trades.extend(batch);
                self.position_state.apply_batch(batch);
            }
            FeedEvent::Unknown { .. } => {}
        }
        self
    }

    pub fn book(&self) -> Option<&BookSnapshot> {
        self.book.as_ref()
    }

    pub fn trades(&self) -> &TradeWindow {
        &self.trades
    }

    pub fn position(&self) -> f64 {
        self.position_state.position()
    }

    pub fn pnl_series(&self) -> &[f64] {
        self.position_state.pnl_series()
    }

    pub fn current_pnl(&self) -> f64 {
        self.position_state.current_pnl()
    }
}

/// Rebuild state from the initial value by applying `events` in order.
pub fn replay<'a, I>(events: I) -> DashboardState
where
    I: IntoIterator<Item = &'a FeedEvent>,
{
    events
        .into_iter()
        .fold(DashboardState::default(), |state, event| state.apply(event))
}
