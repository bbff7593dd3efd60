/*
[INPUT]:  Recent trades from the current DashboardSnapshot (newest first)
[OUTPUT]: Trade tape table rendered into Ratatui frame
[POS]:    TUI UI trade tape panel
[UPDATE]: When changing trade tape columns
*/

use ratatui::layout::Constraint;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::snapshot::DashboardSnapshot;
use crate::tui::format::{border_style, format_fixed, format_trade_time, header_style, side_style};

pub(in crate::tui) fn draw_trade_tape(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    snapshot: &DashboardSnapshot,
) {
    let mut rows = Vec::new();
    for trade in &snapshot.recent_trades {
        rows.push(Row::new(vec![
            Cell::from(Span::styled(
                trade.aggressor_side.as_str(),
                side_style(trade.aggressor_side),
            )),
            Cell::from(format_fixed(trade.price, 2)),
            Cell::from(format_fixed(trade.qty, 4)),
            Cell::from(format_trade_time(trade.ts)),
        ]));
    }

    if rows.is_empty() {
        rows.push(Row::new(vec![
            Cell::from("No trades yet"),
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
        ]));
    }

    let header = Row::new(vec![
        Cell::from("Side"),
        Cell::from("Price"),
        Cell::from("Qty"),
        Cell::from("Time"),
    ])
    .style(header_style());

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(format!("Trades ({})", snapshot.trade_count)),
    );
    frame.render_widget(table, area);
}
