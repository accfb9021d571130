use ratatui::style::Color;

use crate::analysis::Level;
use crate::results::RoundResult;

/// Upper bound for the per-round bar chart; never below 1 so empty charts
/// still draw an axis.
pub fn bar_chart_max(results: &[RoundResult]) -> u64 {
    results
        .iter()
        .map(|r| r.correct().max(r.incorrect()) as u64)
        .max()
        .unwrap_or(0)
        .max(1)
}

pub fn round_label(round_number: usize) -> String {
    format!("R{round_number}")
}

pub fn level_color(level: Level) -> Color {
    match level.grade() {
        Some(2) => Color::Green,
        Some(1) => Color::Yellow,
        Some(_) => Color::Red,
        None => Color::Gray,
    }
}

/// Display percentage with one decimal, or a dash when undefined.
pub fn format_pct(val: Option<f64>) -> String {
    match val {
        Some(v) => format!("{v:.1}%"),
        None => "-".to_string(),
    }
}
