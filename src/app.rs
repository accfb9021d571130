use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

use crate::config::TestConfig;
use crate::engine::RoundEngine;
use crate::error::ConfigError;
use crate::results::RoundResult;
use crate::summary::TestSummary;

pub const MAX_NAME_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    NameEntry,
    Testing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

type ResultSlot = Rc<RefCell<Option<Vec<RoundResult>>>>;

/// Drives a [`RoundEngine`] from terminal input and holds what the screens
/// render.
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub name_input: String,
    pub engine: RoundEngine,
    pub summary: Option<TestSummary>,
    finished: ResultSlot,
    config: TestConfig,
    seed: Option<u64>,
}

impl App {
    pub fn new(
        config: TestConfig,
        seed: Option<u64>,
        name: Option<String>,
    ) -> Result<Self, ConfigError> {
        let finished: ResultSlot = Rc::new(RefCell::new(None));
        let engine = build_engine(&config, seed, &finished)?;
        Ok(Self {
            state: AppState::NameEntry,
            name_input: name.unwrap_or_default(),
            engine,
            summary: None,
            finished,
            config,
            seed,
        })
    }

    /// Begins the test with the entered name. Blank names are refused.
    pub fn start_test(&mut self) -> bool {
        let name = self.name_input.trim();
        if name.is_empty() || self.state != AppState::NameEntry {
            return false;
        }
        let name = name.to_string();
        self.engine.start(name);
        self.state = AppState::Testing;
        true
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Testing {
            self.engine.tick();
            self.collect_finished();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }

        match self.state {
            AppState::NameEntry => match key.code {
                KeyCode::Esc => return AppAction::Quit,
                KeyCode::Enter => {
                    self.start_test();
                }
                KeyCode::Backspace => {
                    self.name_input.pop();
                }
                KeyCode::Char(c) if !c.is_control() => {
                    let mut buf = [0; 4];
                    let added = c.encode_utf8(&mut buf);
                    if self.name_input.width() + added.width() <= MAX_NAME_WIDTH {
                        self.name_input.push(c);
                    }
                }
                _ => {}
            },
            AppState::Testing => {
                match key.code {
                    KeyCode::Char(c) => {
                        // only characters on offer count as an answer
                        if let Some(option) =
                            self.engine.current_question().and_then(|q| q.option_for(c))
                        {
                            self.engine.submit_answer(option);
                        } else {
                            debug!(key = %c, "key is not an option, ignored");
                        }
                    }
                    KeyCode::Enter => {
                        self.engine.end_round_now();
                    }
                    KeyCode::Esc => {
                        self.engine.end_test_now();
                    }
                    _ => {}
                }
                self.collect_finished();
            }
            AppState::Results => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
                KeyCode::Char('r') => self.restart(),
                _ => {}
            },
        }

        AppAction::Continue
    }

    /// Back to name entry with a fresh engine, keeping the participant's name.
    pub fn restart(&mut self) {
        let finished: ResultSlot = Rc::new(RefCell::new(None));
        // config was validated when the app was built
        if let Ok(engine) = build_engine(&self.config, self.seed, &finished) {
            self.name_input = self.engine.participant().to_string();
            self.engine = engine;
            self.finished = finished;
            self.summary = None;
            self.state = AppState::NameEntry;
            info!("test reset for another attempt");
        }
    }

    fn collect_finished(&mut self) {
        let results = self.finished.borrow_mut().take();
        if let Some(results) = results {
            self.summary = Some(TestSummary::new(self.engine.participant(), results));
            self.state = AppState::Results;
        }
    }
}

fn build_engine(
    config: &TestConfig,
    seed: Option<u64>,
    slot: &ResultSlot,
) -> Result<RoundEngine, ConfigError> {
    let mut engine = match seed {
        Some(seed) => RoundEngine::seeded(config.clone(), seed)?,
        None => RoundEngine::new(config.clone())?,
    };
    let slot = Rc::clone(slot);
    engine.set_on_finished(move |results| {
        *slot.borrow_mut() = Some(results.to_vec());
    });
    Ok(engine)
}
