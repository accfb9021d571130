use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};

use crate::analysis::PerformanceAspect;
use crate::app::App;
use crate::summary::TestSummary;
use crate::ui::charting::{bar_chart_max, format_pct, level_color, round_label};
use crate::ui::{bold_style, dim_style, italic_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(summary) = app.summary.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),  // title
            Constraint::Length(1),  // totals
            Constraint::Length(1),  // padding
            Constraint::Length(10), // analysis grid
            Constraint::Min(6),     // chart + table
            Constraint::Length(1),  // legend
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled("Test results", bold_style()),
        Span::styled("   participant: ", dim_style()),
        Span::styled(summary.participant.clone(), bold_style()),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{} answered", summary.totals.answered), bold_style()),
        Span::raw("   "),
        Span::styled(
            format!("{} correct", summary.totals.correct),
            bold_style().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} wrong", summary.totals.incorrect),
            bold_style().fg(Color::Red),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} acc", format_pct(summary.metrics.accuracy_pct)),
            dim_style(),
        ),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    render_analysis(summary, chunks[3], buf);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[4]);
    render_chart(summary, bottom[0], buf);
    render_table(summary, bottom[1], buf);

    Paragraph::new(Span::styled("(r)etry / (q)uit", italic_style())).render(chunks[5], buf);
}

fn render_analysis(summary: &TestSummary, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let report = &summary.report;
    let cards = [
        ("Speed", &report.speed),
        ("Accuracy", &report.accuracy),
        ("Endurance", &report.endurance),
        ("Consistency", &report.consistency),
    ];

    for (row_idx, pair) in cards.chunks(2).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[row_idx]);
        for ((title, aspect), col) in pair.iter().zip(cols.iter()) {
            aspect_card(title, aspect, *col, buf);
        }
    }
}

fn aspect_card(title: &str, aspect: &PerformanceAspect, area: Rect, buf: &mut Buffer) {
    let level = Span::styled(
        aspect.level.to_string(),
        bold_style().fg(level_color(aspect.level)),
    );
    Paragraph::new(vec![
        Line::from(level),
        Line::from(Span::styled(aspect.description, dim_style())),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title.to_string(), bold_style())),
    )
    .render(area, buf);
}

fn render_chart(summary: &TestSummary, area: Rect, buf: &mut Buffer) {
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Per round (correct / wrong)"),
        )
        .bar_width(2)
        .bar_gap(0)
        .group_gap(1)
        .max(bar_chart_max(&summary.results));

    for r in &summary.results {
        let bars = [
            Bar::default()
                .value(r.correct() as u64)
                .style(Style::default().fg(Color::Green)),
            Bar::default()
                .value(r.incorrect() as u64)
                .style(Style::default().fg(Color::Red)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(round_label(r.round_number())))
                .bars(&bars),
        );
    }

    chart.render(area, buf);
}

fn render_table(summary: &TestSummary, area: Rect, buf: &mut Buffer) {
    let header = Row::new(vec![
        Cell::from("Round"),
        Cell::from("Answered"),
        Cell::from("Correct").style(Style::default().fg(Color::Green)),
        Cell::from("Wrong").style(Style::default().fg(Color::Red)),
    ])
    .style(bold_style());

    let rows = summary.results.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.round_number().to_string()),
            Cell::from(r.answered().to_string()),
            Cell::from(r.correct().to_string()),
            Cell::from(r.incorrect().to_string()),
        ])
    });

    Table::new(rows, [Constraint::Length(8); 4])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Detail"))
        .render(area, buf);
}
