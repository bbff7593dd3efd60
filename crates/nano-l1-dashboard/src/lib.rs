/*
[INPUT]:  Public API exports for nano-l1-dashboard crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod headless;
pub mod position;
pub mod reducer;
pub mod session;
pub mod snapshot;
pub mod trade_window;
pub mod tui;

// Re-export main types for convenience
pub use config::{DashboardConfig, ReconnectConfig, UiConfig};
pub use position::PositionState;
pub use reducer::{DashboardState, replay};
pub use session::{DashboardSession, FeedStatus, SnapshotReceiver};
pub use snapshot::{DashboardSnapshot, VIEW_DEPTH};
pub use trade_window::{TRADE_WINDOW_CAPACITY, TradeWindow};
