/*
[INPUT]:  BookSnapshot from the current DashboardSnapshot
[OUTPUT]: Top-of-book table rendered into Ratatui frame
[POS]:    TUI UI depth panel
[UPDATE]: When changing top-of-book columns
*/

use ratatui::layout::Constraint;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::snapshot::DashboardSnapshot;
use crate::tui::format::{border_style, format_fixed, format_optional, header_style};

pub(in crate::tui) fn draw_top_of_book(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    snapshot: &DashboardSnapshot,
) {
    let Some(book) = snapshot.book.as_ref() else {
        return;
    };

    let header = Row::new(vec![
        Cell::from("Side"),
        Cell::from("Price"),
        Cell::from("Qty"),
    ])
    .style(header_style());

    let rows = vec![
        Row::new(vec![
            Cell::from(Span::styled("Bid", Style::default().fg(Color::LightGreen))),
            Cell::from(format_fixed(book.best_bid.price, 2)),
            Cell::from(format_fixed(book.best_bid.qty, 2)),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("Ask", Style::default().fg(Color::LightRed))),
            Cell::from(format_fixed(book.best_ask.price, 2)),
            Cell::from(format_fixed(book.best_ask.qty, 2)),
        ]),
        Row::new(vec![
            Cell::from("Spread"),
            Cell::from(format_fixed(snapshot.spread(), 2)),
            Cell::from(""),
        ]),
        Row::new(vec![
            Cell::from("Last"),
            Cell::from(format_optional(book.last_trade_price, 2)),
            Cell::from(""),
        ]),
    ];

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Top of Book"),
    );
    frame.render_widget(table, area);
}
