use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{App, AppState};
use crate::ui::{name_entry, results, testing};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

pub struct NameEntryScreen;

impl Screen for NameEntryScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        name_entry::render(app, area, buf);
    }
}

/// Active rounds and breaks
pub struct TestingScreen;

impl Screen for TestingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        testing::render(app, area, buf);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        results::render(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::NameEntry => Box::new(NameEntryScreen),
        AppState::Testing => Box::new(TestingScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
