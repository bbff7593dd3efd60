/*
[INPUT]:  Endpoint, feed status and snapshot counters
[OUTPUT]: Title bar rendered into Ratatui frame
[POS]:    TUI UI header panel
[UPDATE]: When adding header fields
*/

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::session::FeedStatus;
use crate::tui::app::DashboardApp;
use crate::tui::format::border_style;

fn status_style(status: &FeedStatus) -> Style {
    match status {
        FeedStatus::Connected => Style::default().fg(Color::LightGreen),
        FeedStatus::Connecting => Style::default().fg(Color::Yellow),
        FeedStatus::Disconnected { .. } => Style::default().fg(Color::LightRed),
        FeedStatus::Idle | FeedStatus::Stopped => Style::default().fg(Color::DarkGray),
    }
}

pub(in crate::tui) fn draw_header(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &DashboardApp,
) {
    let snapshot = &app.snapshot;
    let symbol = snapshot
        .book
        .as_ref()
        .and_then(|book| book.symbol.as_deref())
        .unwrap_or("-");

    let line = Line::from(vec![
        Span::styled(
            "Nano L1 Dashboard",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::raw(app.endpoint.as_str()),
        Span::raw("  |  "),
        Span::styled(app.feed_status.label(), status_style(&app.feed_status)),
        Span::raw(format!(
            "  |  {symbol}  |  trades {}",
            snapshot.trade_count
        )),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style()),
    );
    frame.render_widget(widget, area);
}
