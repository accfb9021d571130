use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Length of one engine tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum QuizEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait QuizEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<QuizEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // release/repeat events would count as extra answers on some platforms
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(QuizEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(QuizEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<QuizEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<QuizEvent>) -> Self {
        Self { rx }
    }
}

impl QuizEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks are scheduled against a deadline rather than an idle timeout, so a
/// steady stream of key presses cannot hold the clock back: every elapsed
/// interval yields exactly one `Tick`.
pub struct Runner<E: QuizEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
}

impl<E: QuizEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Restarts the tick schedule from now, e.g. when a test begins.
    pub fn reset_clock(&mut self) {
        self.next_tick = Instant::now() + self.ticker.interval();
    }

    /// Blocks until the next event or the tick deadline, whichever is first
    pub fn step(&mut self) -> QuizEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.fire_tick();
        }

        let wait = self.next_tick - now;
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.fire_tick(),
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(wait);
                self.fire_tick()
            }
        }
    }

    fn fire_tick(&mut self) -> QuizEvent {
        self.next_tick += self.ticker.interval();
        QuizEvent::Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        let ev = runner.step();
        match ev {
            QuizEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(QuizEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(50));
        let mut runner = Runner::new(es, ticker);

        match runner.step() {
            QuizEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn key_flood_does_not_starve_ticks() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..10_000 {
            tx.send(QuizEvent::Key(KeyEvent::new(
                KeyCode::Char('a'),
                KeyModifiers::NONE,
            )))
            .unwrap();
        }
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(5));
        let mut runner = Runner::new(es, ticker);

        std::thread::sleep(Duration::from_millis(20));
        // the deadline has passed, so a tick is due before any queued key
        assert!(matches!(runner.step(), QuizEvent::Tick));
    }

    #[test]
    fn disconnected_source_still_ticks() {
        let (tx, rx) = mpsc::channel::<QuizEvent>();
        drop(tx);
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(2));
        let mut runner = Runner::new(es, ticker);

        for _ in 0..3 {
            assert!(matches!(runner.step(), QuizEvent::Tick));
        }
    }

    #[test]
    fn default_ticker_is_one_second() {
        assert_eq!(FixedTicker::default().interval(), Duration::from_secs(1));
    }
}
