/*
[INPUT]:  P&L tail, position and mark price from the current DashboardSnapshot
[OUTPUT]: P&L figures and line chart rendered into Ratatui frame
[POS]:    TUI UI P&L panel
[UPDATE]: When changing P&L figures or chart scaling
*/

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap};

use crate::snapshot::{DashboardSnapshot, VIEW_DEPTH};
use crate::tui::format::{border_style, format_fixed, format_optional, muted_style, signed_style};

const STATS_HEIGHT: u16 = 9;

pub(in crate::tui) fn draw_pnl_panel(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    snapshot: &DashboardSnapshot,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(STATS_HEIGHT), Constraint::Min(3)])
        .split(area);

    draw_pnl_stats(frame, layout[0], snapshot);
    draw_pnl_chart(frame, layout[1], &snapshot.pnl_tail);
}

fn draw_pnl_stats(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    snapshot: &DashboardSnapshot,
) {
    let tail = snapshot
        .pnl_tail
        .iter()
        .map(|value| format_fixed(*value, 1))
        .collect::<Vec<_>>()
        .join(" ");

    let lines = vec![
        Line::from(vec![
            Span::raw("P&L       "),
            Span::styled(format_fixed(snapshot.pnl, 2), signed_style(snapshot.pnl)),
        ]),
        Line::from(vec![
            Span::raw("Position  "),
            Span::styled(
                format_fixed(snapshot.position, 4),
                signed_style(snapshot.position),
            ),
        ]),
        Line::from(format!(
            "Mark      {}",
            format_optional(snapshot.mark_to_market(), 2)
        )),
        Line::from(format!("Points    {}", snapshot.pnl_points)),
        Line::from(format!("Last {VIEW_DEPTH}: {tail}")),
        Line::from(Span::styled(
            "Assumes every observed trade is a local fill",
            muted_style(),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("P&L"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

/// Y bounds padded so a flat series still draws inside the plot.
pub(super) fn chart_bounds(values: &[f64]) -> [f64; 2] {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return [-1.0, 1.0];
    }
    if (hi - lo).abs() < f64::EPSILON {
        return [lo - 1.0, hi + 1.0];
    }
    [lo, hi]
}

fn draw_pnl_chart(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, values: &[f64]) {
    let points = values
        .iter()
        .enumerate()
        .map(|(i, value)| (i as f64, *value))
        .collect::<Vec<_>>();
    let [lo, hi] = chart_bounds(values);
    let max_x = points.len().saturating_sub(1).max(1) as f64;

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("P&L History"),
        )
        .x_axis(Axis::default().bounds([0.0, max_x]))
        .y_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec![format_fixed(lo, 1), format_fixed(hi, 1)]),
        );
    frame.render_widget(chart, area);
}
