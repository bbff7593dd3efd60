/*
[INPUT]:  Current tab, status message
[OUTPUT]: Tab bar, waiting placeholder and hotkey footer
[POS]:    TUI UI shared layout pieces
[UPDATE]: When changing tabs or hotkeys
*/

use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};

use crate::tui::app::{DashboardApp, Tab};
use crate::tui::format::{border_style, header_style, muted_style};

pub(in crate::tui) const WAITING_PLACEHOLDER: &str = "Waiting for stream…";

pub(in crate::tui) fn draw_tabs(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    current_tab: Tab,
) {
    let titles = vec![Line::from("Dashboard"), Line::from("Logs")];

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Tabs"),
        )
        .highlight_style(header_style())
        .select(current_tab.index());

    frame.render_widget(tabs, area);
}

pub(in crate::tui) fn draw_waiting(frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
    let widget = Paragraph::new(Span::styled(WAITING_PLACEHOLDER, muted_style()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Market"),
        );
    frame.render_widget(widget, area);
}

pub(in crate::tui) fn draw_footer(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &DashboardApp,
) {
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled("[Tab/l]", key_style),
        Span::raw(" Switch  "),
        Span::styled("[1/2]", key_style),
        Span::raw(" Tabs  "),
        Span::styled("[q/Esc]", key_style),
        Span::raw(" Quit  "),
        Span::raw(format!("Status: {}", app.status_message)),
    ]);

    let widget = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Hotkeys"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}
