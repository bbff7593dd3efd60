/*
[INPUT]:  LogBufferHandle contents
[OUTPUT]: Log panel rendered into Ratatui frame
[POS]:    TUI UI logs panel rendering
[UPDATE]: When changing log panel behaviour
*/

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::format::{border_style, muted_style};
use crate::tui::logging::{LogBufferHandle, lock_buffer};

pub(in crate::tui) fn draw_logs(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    buffer: Option<&LogBufferHandle>,
) {
    let available = area.height.saturating_sub(2) as usize;
    let text = match buffer {
        Some(buffer) => lock_buffer(buffer)
            .tail(available)
            .into_iter()
            .map(|line| Line::from(Span::raw(line)))
            .collect::<Vec<_>>(),
        None => vec![Line::from(Span::styled(
            "Logs are written to file",
            muted_style(),
        ))],
    };

    let log_widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Logs"),
    );
    frame.render_widget(log_widget, area);
}
