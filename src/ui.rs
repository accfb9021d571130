pub mod charting;
pub mod name_entry;
pub mod results;
pub mod screen;
pub mod testing;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::App;

const HORIZONTAL_MARGIN: u16 = 3;
const VERTICAL_MARGIN: u16 = 1;

fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.state).render(self, area, buf);
    }
}
