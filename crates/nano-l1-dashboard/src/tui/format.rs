/*
[INPUT]:  Snapshot numbers, sides, engine timestamps
[OUTPUT]: Display strings and styles shared by panels
[POS]:    TUI formatting helpers
[UPDATE]: When changing number formats or palette
*/

use chrono::DateTime;
use ratatui::style::{Color, Modifier, Style};

use nano_l1_feed::Side;

pub(crate) fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

pub(crate) fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|value| format_fixed(value, decimals))
        .unwrap_or_else(|| "-".to_string())
}

/// Engine timestamps are nanoseconds since the epoch; shown as UTC wall time.
pub(crate) fn format_trade_time(ts: Option<i64>) -> String {
    match ts {
        Some(ts) => DateTime::from_timestamp_nanos(ts)
            .format("%H:%M:%S%.3f")
            .to_string(),
        None => "-".to_string(),
    }
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub(crate) fn signed_style(value: f64) -> Style {
    if value < 0.0 {
        Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD)
    } else if value > 0.0 {
        Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

pub(crate) fn side_style(side: Side) -> Style {
    match side {
        Side::Buy => Style::default().fg(Color::LightGreen),
        Side::Sell => Style::default().fg(Color::LightRed),
    }
}
