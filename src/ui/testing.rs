use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::engine::{Phase, Snapshot};
use crate::question::Question;
use crate::ui::{bold_style, dim_style, italic_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::util::format_clock;

const NAME_COLUMN_WIDTH: usize = 24;

/// Spreads characters out so they read as separate glyphs.
pub fn spaced(s: &str) -> String {
    s.chars().join(" ")
}

/// Cuts a name to fit the header, marking the cut with an ellipsis.
pub fn fit_name(name: &str, max_width: usize) -> String {
    if name.width() <= max_width {
        return name.to_string();
    }
    let mut out = String::new();
    for c in name.chars() {
        let mut buf = [0; 4];
        if out.width() + c.encode_utf8(&mut buf).width() + 1 > max_width {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let snap = app.engine.snapshot();
    match snap.phase {
        Phase::Break => render_break(&snap, area, buf),
        _ => render_round(app, &snap, area, buf),
    }
}

fn render_break(snap: &Snapshot<'_>, area: Rect, buf: &mut Buffer) {
    let height_above = area.height.saturating_sub(5) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(height_above),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("BREAK", bold_style().fg(Color::Yellow)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!(
            "Round {} of {} starts in",
            snap.round_index + 2,
            snap.total_rounds
        ),
        dim_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        snap.seconds_remaining.to_string(),
        bold_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

fn render_round(app: &App, snap: &Snapshot<'_>, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(1), // padding
            Constraint::Min(12),   // question
            Constraint::Length(1), // tally
            Constraint::Length(1), // legend
        ])
        .split(area);

    render_header(app, snap, chunks[0], buf);

    match snap.question {
        Some(question) => render_question(question, chunks[2], buf),
        None => {
            let done = Paragraph::new(vec![
                Line::from(Span::styled("Round complete!", bold_style())),
                Line::from(Span::styled(
                    "You have answered every question in this round.",
                    dim_style(),
                )),
            ])
            .alignment(Alignment::Center);
            done.render(chunks[2], buf);
        }
    }

    let tally = Line::from(vec![
        Span::styled(
            format!("correct {}", snap.tally.correct),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("wrong {}", snap.tally.incorrect),
            Style::default().fg(Color::Red),
        ),
    ]);
    Paragraph::new(tally)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(type an option) answer / (enter) next round / (esc) end test",
        italic_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

fn render_header(app: &App, snap: &Snapshot<'_>, area: Rect, buf: &mut Buffer) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    let cells = [
        (
            "Participant",
            fit_name(app.engine.participant(), NAME_COLUMN_WIDTH),
            Color::White,
        ),
        (
            "Round",
            format!("{} / {}", snap.round_index + 1, snap.total_rounds),
            Color::White,
        ),
        ("Time", format_clock(snap.seconds_remaining), Color::Red),
    ];

    for ((title, value, color), column) in cells.into_iter().zip(columns.iter()) {
        Paragraph::new(Span::styled(value, bold_style().fg(color)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title))
            .render(*column, buf);
    }
}

fn render_question(question: &Question, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    boxed(
        "Reference",
        spaced(&question.pattern),
        Color::Red,
        centered(chunks[0], 30),
        buf,
    );
    boxed(
        "Puzzle",
        spaced(&question.puzzle),
        Color::Yellow,
        centered(chunks[2], 30),
        buf,
    );

    let options = question
        .options
        .iter()
        .map(|o| format!("[ {o} ]"))
        .join("  ");
    boxed("Options", options, Color::Cyan, centered(chunks[4], 44), buf);
}

fn boxed(title: &'static str, text: String, color: Color, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(text, bold_style()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, bold_style().fg(color))),
        )
        .render(area, buf);
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced() {
        assert_eq!(spaced("8R2KX"), "8 R 2 K X");
        assert_eq!(spaced(""), "");
    }

    #[test]
    fn test_fit_name() {
        assert_eq!(fit_name("Budi", 10), "Budi");
        assert_eq!(fit_name("Bartholomew Santoso", 10), "Bartholom…");
    }

    #[test]
    fn test_centered() {
        let area = Rect::new(0, 5, 100, 3);
        assert_eq!(centered(area, 30), Rect::new(35, 5, 30, 3));
        let narrow = Rect::new(2, 0, 20, 3);
        assert_eq!(centered(narrow, 30), narrow);
    }
}
