/*
[INPUT]:  Snapshot and feed status watch channels, log buffer, shutdown token
[OUTPUT]: Ratatui-based TUI run loop and top-level frame layout
[POS]:    TUI runtime loop
[UPDATE]: When changing the run loop or top-level layout
*/

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEventKind};
use ratatui::layout::{Constraint, Direction, Layout};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::session::{FeedStatus, SnapshotReceiver};

use super::app::{DashboardApp, Tab};
use super::events::handle_key_event;
use super::logging::LogBufferHandle;
use super::terminal::TerminalGuard;
use super::ui::*;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
const DEPTH_PANEL_HEIGHT: u16 = 8;

enum UiEvent {
    Input(CrosstermEvent),
}

/// Runs the terminal UI until the user quits or `shutdown` fires.
///
/// Redraws on every tick and whenever a new snapshot or feed status arrives.
pub async fn run_tui(
    endpoint: String,
    mut snapshots: SnapshotReceiver,
    mut status: watch::Receiver<FeedStatus>,
    log_buffer: Option<LogBufferHandle>,
    tick_interval: Duration,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    let input_shutdown_clone = input_shutdown.clone();

    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    let _ = event_tx.send(UiEvent::Input(event));
                }
            }
        }
    });

    let mut app = DashboardApp::new(endpoint, log_buffer);
    app.snapshot = Arc::clone(&snapshots.borrow_and_update());
    app.set_feed_status(status.borrow_and_update().clone());

    let mut tick = tokio::time::interval(tick_interval);
    let mut snapshots_open = true;
    let mut status_open = true;
    let mut should_quit = false;

    while !should_quit {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("tui shutdown requested");
                should_quit = true;
            }
            _ = tick.tick() => {}
            changed = snapshots.changed(), if snapshots_open => match changed {
                Ok(()) => app.snapshot = Arc::clone(&snapshots.borrow_and_update()),
                Err(_) => snapshots_open = false,
            },
            changed = status.changed(), if status_open => match changed {
                Ok(()) => {
                    let next = status.borrow_and_update().clone();
                    app.set_feed_status(next);
                }
                Err(_) => status_open = false,
            },
            maybe_event = event_rx.recv() => match maybe_event {
                Some(UiEvent::Input(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    should_quit = handle_key_event(&mut app, key.code);
                }
                Some(_) => {}
                None => should_quit = true,
            },
        }

        terminal.draw(|frame| draw_ui(frame, &app))?;
    }

    input_shutdown.cancel();
    Ok(())
}

pub(super) fn draw_ui(frame: &mut ratatui::Frame, app: &DashboardApp) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_tabs(frame, layout[0], app.current_tab);
    draw_header(frame, layout[1], app);

    match app.current_tab {
        Tab::Dashboard => draw_dashboard(frame, layout[2], app),
        Tab::Logs => draw_logs(frame, layout[2], app.log_buffer.as_ref()),
    }

    draw_footer(frame, layout[3], app);
}

fn draw_dashboard(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &DashboardApp) {
    let snapshot = &app.snapshot;
    if snapshot.book.is_none() {
        draw_waiting(frame, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(DEPTH_PANEL_HEIGHT), Constraint::Min(5)])
        .split(columns[0]);

    draw_top_of_book(frame, left[0], snapshot);
    draw_pnl_panel(frame, left[1], snapshot);
    draw_trade_tape(frame, columns[1], snapshot);
}
