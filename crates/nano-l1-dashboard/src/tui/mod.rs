/*
[INPUT]:  Session snapshot/status channels and tracing output
[OUTPUT]: Ratatui dashboard, log capture and terminal lifecycle
[POS]:    TUI module for the nano-l1-dashboard binary
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

mod app;
mod events;
mod format;
mod logging;
mod runtime;
mod terminal;
mod ui;

pub use app::{DashboardApp, Tab};
pub use logging::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriter, LogWriterFactory};
pub use runtime::run_tui;
