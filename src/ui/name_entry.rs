use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::App;
use crate::ui::{bold_style, dim_style, italic_style, HORIZONTAL_MARGIN};

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let height_above = area.height.saturating_sub(8) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(height_above),
            Constraint::Length(1), // title
            Constraint::Length(2), // prompt
            Constraint::Length(3), // input box
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("Welcome!", bold_style()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "Enter your full name to begin the test.",
        dim_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    let input = Line::from(vec![
        Span::styled(app.name_input.clone(), bold_style().fg(Color::Yellow)),
        Span::styled("_", dim_style()),
    ]);
    Paragraph::new(input)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Full name")
                .border_style(Style::default().fg(Color::Gray)),
        )
        .render(chunks[3], buf);

    Paragraph::new(Span::styled("(enter) start / (esc) quit", italic_style()))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
}
