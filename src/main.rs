use cermat::{
    app::{App, AppAction, AppState},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, TestConfig},
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    telemetry,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

/// timed missing-character accuracy test with psychometric scoring
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed pattern-recognition test: spot the character missing from a shuffled template, round after round, then read a speed, accuracy, endurance and consistency report."
)]
pub struct Cli {
    /// participant name; skips the name entry screen
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// seed for question generation, for a reproducible battery
    #[clap(long)]
    seed: Option<u64>,

    /// print the per-round results and analysis as JSON after the test
    #[clap(long)]
    json: bool,

    /// log file location (filter with CERMAT_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        telemetry::init_tracing(&log_path)?;
    }

    let store = FileConfigStore::new();
    let prefs = store.load();
    let given_name = cli.name.clone().filter(|n| !n.trim().is_empty());
    let mut app = App::new(
        TestConfig::default(),
        cli.seed,
        given_name.clone().or(prefs.last_participant),
    )?;
    if given_name.is_some() {
        app.start_test();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome?;

    let participant = app.engine.participant();
    if !participant.is_empty() {
        let cfg = Config {
            last_participant: Some(participant.to_string()),
        };
        if let Err(e) = store.save(&cfg) {
            warn!(error = %e, "could not save preferences");
        }
    }

    if cli.json {
        if let Some(summary) = &app.summary {
            println!("{}", summary.to_json()?);
        }
    }

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            QuizEvent::Tick => app.on_tick(),
            QuizEvent::Resize => {}
            QuizEvent::Key(key) => {
                let before = app.state;
                if app.handle_key(key) == AppAction::Quit {
                    info!("quit requested");
                    break;
                }
                // the first second of a round must be a full second
                if before == AppState::NameEntry && app.state == AppState::Testing {
                    runner.reset_clock();
                }
            }
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
