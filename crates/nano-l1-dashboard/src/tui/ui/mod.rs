/*
[INPUT]:  DashboardApp view state and shared DashboardSnapshot
[OUTPUT]: Panel draw functions and module exports
[POS]:    TUI UI module root
[UPDATE]: When adding or splitting panels
*/

mod depth;
mod header;
mod layout;
mod logs;
mod pnl;
mod trades;

pub(in crate::tui) use depth::draw_top_of_book;
pub(in crate::tui) use header::draw_header;
pub(in crate::tui) use layout::{draw_footer, draw_tabs, draw_waiting};
#[cfg(test)]
pub(in crate::tui) use layout::WAITING_PLACEHOLDER;
pub(in crate::tui) use logs::draw_logs;
pub(in crate::tui) use pnl::draw_pnl_panel;
pub(in crate::tui) use trades::draw_trade_tape;
