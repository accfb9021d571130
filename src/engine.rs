use std::fmt;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::config::TestConfig;
use crate::error::ConfigError;
use crate::question::{generate_round, Question};
use crate::results::{RoundResult, Tally};

/// Where the engine is in the test lifecycle. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Active,
    Break,
    Finished,
}

/// Everything that can happen to the engine, funnelled through
/// [`RoundEngine::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(String),
    Answer(char),
    EndRound,
    EndTest,
    /// One second of real time has passed
    Tick,
}

/// State change produced by a command. Ignored commands produce none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Started,
    Answered { correct: bool },
    BreakStarted(RoundResult),
    RoundStarted { round_index: usize },
    Finished(RoundResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
enum EndReason {
    #[strum(serialize = "timeout")]
    Timeout,
    #[strum(serialize = "manual")]
    Manual,
}

pub type FinishedCallback = Box<dyn FnOnce(&[RoundResult])>;

/// Read-only view of the engine for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub round_index: usize,
    pub total_rounds: usize,
    pub seconds_remaining: u32,
    pub question: Option<&'a Question>,
    pub tally: Tally,
}

/// Round/break state machine. A single countdown serves whichever timed
/// phase is current, so a round timer and a break timer never run together.
pub struct RoundEngine<R: Rng = StdRng> {
    config: TestConfig,
    rng: R,
    phase: Phase,
    participant: String,
    round_index: usize,
    seconds_remaining: u32,
    questions: Vec<Question>,
    question_index: usize,
    tally: Tally,
    results: Vec<RoundResult>,
    on_finished: Option<FinishedCallback>,
}

impl RoundEngine<StdRng> {
    pub fn new(config: TestConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: TestConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RoundEngine<R> {
    pub fn with_rng(config: TestConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let seconds_remaining = config.round_duration_secs;
        Ok(Self {
            config,
            rng,
            phase: Phase::Idle,
            participant: String::new(),
            round_index: 0,
            seconds_remaining,
            questions: vec![],
            question_index: 0,
            tally: Tally::default(),
            results: vec![],
            on_finished: None,
        })
    }

    /// Registers the receiver of the final result list. It runs once, when
    /// the engine reaches [`Phase::Finished`].
    pub fn set_on_finished<F>(&mut self, callback: F)
    where
        F: FnOnce(&[RoundResult]) + 'static,
    {
        self.on_finished = Some(Box::new(callback));
    }

    pub fn start(&mut self, name: impl Into<String>) -> Option<Transition> {
        self.dispatch(Command::Start(name.into()))
    }

    pub fn submit_answer(&mut self, selected: char) -> Option<Transition> {
        self.dispatch(Command::Answer(selected))
    }

    pub fn end_round_now(&mut self) -> Option<Transition> {
        self.dispatch(Command::EndRound)
    }

    pub fn end_test_now(&mut self) -> Option<Transition> {
        self.dispatch(Command::EndTest)
    }

    pub fn tick(&mut self) -> Option<Transition> {
        self.dispatch(Command::Tick)
    }

    pub fn dispatch(&mut self, command: Command) -> Option<Transition> {
        match (self.phase, command) {
            (Phase::Idle, Command::Start(name)) => Some(self.begin(name)),
            (Phase::Active, Command::Answer(selected)) => self.answer(selected),
            (Phase::Active, Command::EndRound) => Some(self.close_round(EndReason::Manual)),
            (Phase::Active, Command::EndTest) => Some(self.end_test()),
            (Phase::Active, Command::Tick) => self.tick_round(),
            (Phase::Break, Command::Tick) => self.tick_break(),
            (phase, Command::Start(_)) => {
                warn!(%phase, "start ignored, engine has already been started");
                None
            }
            (phase, command) => {
                trace!(%phase, ?command, "command ignored");
                None
            }
        }
    }

    fn begin(&mut self, name: String) -> Transition {
        info!(participant = %name, rounds = self.config.total_rounds, "test started");
        self.participant = name;
        self.results.clear();
        self.round_index = 0;
        self.open_round();
        Transition::Started
    }

    fn open_round(&mut self) {
        let template = self.config.template_for_round(self.round_index);
        self.questions = generate_round(
            template,
            self.config.questions_per_round,
            self.config.options_per_question,
            &mut self.rng,
        );
        self.question_index = 0;
        self.tally = Tally::default();
        self.seconds_remaining = self.config.round_duration_secs;
        self.phase = Phase::Active;
        debug!(round = self.round_index + 1, template, "round opened");
    }

    fn answer(&mut self, selected: char) -> Option<Transition> {
        let correct = self.questions.get(self.question_index)?.is_correct(selected);
        if correct {
            self.tally.correct += 1;
        } else {
            self.tally.incorrect += 1;
        }
        self.question_index += 1;
        debug!(
            round = self.round_index + 1,
            correct,
            tally_correct = self.tally.correct,
            tally_incorrect = self.tally.incorrect,
            "answer recorded"
        );
        Some(Transition::Answered { correct })
    }

    fn tick_round(&mut self) -> Option<Transition> {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            Some(self.close_round(EndReason::Timeout))
        } else {
            None
        }
    }

    fn tick_break(&mut self) -> Option<Transition> {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return None;
        }
        self.round_index += 1;
        self.open_round();
        Some(Transition::RoundStarted {
            round_index: self.round_index,
        })
    }

    /// Seals the current tally. Leaves `Active` before anything else so a
    /// round can only be closed once.
    fn seal_round(&mut self, reason: EndReason) -> RoundResult {
        let result = self.tally.into_result(self.round_index + 1);
        self.results.push(result);
        self.questions.clear();
        self.question_index = 0;
        info!(
            round = result.round_number(),
            %reason,
            answered = result.answered(),
            correct = result.correct(),
            incorrect = result.incorrect(),
            "round ended"
        );
        result
    }

    fn close_round(&mut self, reason: EndReason) -> Transition {
        let result = self.seal_round(reason);
        if self.round_index + 1 >= self.config.total_rounds {
            self.finish();
            Transition::Finished(result)
        } else {
            self.phase = Phase::Break;
            self.seconds_remaining = self.config.break_duration_secs;
            debug!(secs = self.seconds_remaining, "break started");
            Transition::BreakStarted(result)
        }
    }

    fn end_test(&mut self) -> Transition {
        let result = self.seal_round(EndReason::Manual);
        self.finish();
        Transition::Finished(result)
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.seconds_remaining = 0;
        info!(
            participant = %self.participant,
            rounds = self.results.len(),
            "test finished"
        );
        if let Some(callback) = self.on_finished.take() {
            callback(&self.results);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn participant(&self) -> &str {
        &self.participant
    }

    /// 0-based; add one for display.
    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn total_rounds(&self) -> usize {
        self.config.total_rounds
    }

    /// Seconds left in the current round or break.
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// `None` outside an active round or once the round's list is used up.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Active => self.questions.get(self.question_index),
            _ => None,
        }
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            round_index: self.round_index,
            total_rounds: self.config.total_rounds,
            seconds_remaining: self.seconds_remaining,
            question: self.current_question(),
            tally: self.tally,
        }
    }
}

impl<R: Rng> fmt::Debug for RoundEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundEngine")
            .field("phase", &self.phase)
            .field("participant", &self.participant)
            .field("round_index", &self.round_index)
            .field("seconds_remaining", &self.seconds_remaining)
            .field("question_index", &self.question_index)
            .field("tally", &self.tally)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn short_config() -> TestConfig {
        TestConfig {
            total_rounds: 3,
            round_duration_secs: 3,
            break_duration_secs: 2,
            questions_per_round: 4,
            options_per_question: 5,
            templates: vec!["ABC12".into(), "XYZ89".into()],
        }
    }

    fn engine() -> RoundEngine {
        RoundEngine::seeded(short_config(), 11).unwrap()
    }

    fn wrong_option(engine: &RoundEngine) -> char {
        let q = engine.current_question().unwrap();
        *q.options.iter().find(|&&o| o != q.answer).unwrap()
    }

    fn answer_correctly(engine: &mut RoundEngine) -> Option<Transition> {
        let answer = engine.current_question().unwrap().answer;
        engine.submit_answer(answer)
    }

    fn capture_finish(engine: &mut RoundEngine) -> Rc<RefCell<Vec<Vec<RoundResult>>>> {
        let calls = Rc::new(RefCell::new(vec![]));
        let sink = Rc::clone(&calls);
        engine.set_on_finished(move |results| sink.borrow_mut().push(results.to_vec()));
        calls
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let cfg = TestConfig {
            options_per_question: 1,
            ..short_config()
        };
        assert_matches!(
            RoundEngine::seeded(cfg, 0),
            Err(ConfigError::TooFewOptions(1))
        );
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = engine();
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.current_question().is_none());
        assert!(engine.results().is_empty());
    }

    #[test]
    fn test_start_opens_first_round() {
        let mut engine = engine();
        assert_eq!(engine.start("Dewi"), Some(Transition::Started));
        assert_eq!(engine.phase(), Phase::Active);
        assert_eq!(engine.participant(), "Dewi");
        assert_eq!(engine.round_index(), 0);
        assert_eq!(engine.seconds_remaining(), 3);
        assert_eq!(engine.current_question().unwrap().pattern, "ABC12");
    }

    #[test]
    fn test_start_twice_is_ignored() {
        let mut engine = engine();
        engine.start("Dewi");
        answer_correctly(&mut engine);
        assert_eq!(engine.start("Other"), None);
        assert_eq!(engine.participant(), "Dewi");
        assert_eq!(engine.tally().correct, 1);
    }

    #[test]
    fn test_answer_before_start_is_ignored() {
        let mut engine = engine();
        assert_eq!(engine.submit_answer('A'), None);
        assert_eq!(engine.tally(), Tally::default());
    }

    #[test]
    fn test_answers_are_tallied() {
        let mut engine = engine();
        engine.start("Dewi");

        assert_eq!(
            answer_correctly(&mut engine),
            Some(Transition::Answered { correct: true })
        );
        let wrong = wrong_option(&engine);
        assert_eq!(
            engine.submit_answer(wrong),
            Some(Transition::Answered { correct: false })
        );

        assert_eq!(
            engine.tally(),
            Tally {
                correct: 1,
                incorrect: 1
            }
        );
    }

    #[test]
    fn test_lowercase_answer_counts_as_correct() {
        let mut engine = engine();
        engine.start("Dewi");
        let answer = engine.current_question().unwrap().answer;
        engine.submit_answer(answer.to_ascii_lowercase());
        assert_eq!(engine.tally().correct, 1);
    }

    #[test]
    fn test_exhausted_round_waits_for_timer() {
        let mut engine = engine();
        engine.start("Dewi");
        for _ in 0..4 {
            answer_correctly(&mut engine);
        }

        assert!(engine.current_question().is_none());
        assert_eq!(engine.submit_answer('A'), None);
        assert_eq!(engine.phase(), Phase::Active);
        assert_eq!(engine.tally().correct, 4);
        assert_eq!(engine.round_index(), 0);
    }

    #[test]
    fn test_round_timeout_starts_break() {
        let mut engine = engine();
        engine.start("Dewi");
        answer_correctly(&mut engine);

        assert_eq!(engine.tick(), None);
        assert_eq!(engine.tick(), None);
        assert_eq!(
            engine.tick(),
            Some(Transition::BreakStarted(RoundResult::new(1, 1, 0)))
        );
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.seconds_remaining(), 2);
        assert!(engine.current_question().is_none());
    }

    #[test]
    fn test_break_timeout_opens_next_round() {
        let mut engine = engine();
        engine.start("Dewi");
        answer_correctly(&mut engine);
        engine.end_round_now();

        assert_eq!(engine.tick(), None);
        assert_eq!(engine.seconds_remaining(), 1);
        assert_eq!(
            engine.tick(),
            Some(Transition::RoundStarted { round_index: 1 })
        );
        assert_eq!(engine.phase(), Phase::Active);
        assert_eq!(engine.round_index(), 1);
        assert_eq!(engine.seconds_remaining(), 3);
        assert_eq!(engine.tally(), Tally::default());
        assert_eq!(engine.current_question().unwrap().pattern, "XYZ89");
    }

    #[test]
    fn test_templates_cycle_by_round_index() {
        let mut engine = engine();
        engine.start("Dewi");
        let mut patterns = vec![engine.current_question().unwrap().pattern.clone()];
        for _ in 0..2 {
            engine.end_round_now();
            engine.tick();
            engine.tick();
            patterns.push(engine.current_question().unwrap().pattern.clone());
        }
        assert_eq!(patterns, ["ABC12", "XYZ89", "ABC12"]);
    }

    #[test]
    fn test_commands_during_break_are_ignored() {
        let mut engine = engine();
        engine.start("Dewi");
        engine.end_round_now();

        assert_eq!(engine.submit_answer('A'), None);
        assert_eq!(engine.end_round_now(), None);
        assert_eq!(engine.end_test_now(), None);
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.results().len(), 1);
    }

    #[test]
    fn test_full_run_by_timeout() {
        let mut engine = engine();
        let calls = capture_finish(&mut engine);
        engine.start("Dewi");

        let mut ticks = 0;
        while engine.phase() != Phase::Finished {
            if engine.current_question().is_some() {
                answer_correctly(&mut engine);
            }
            engine.tick();
            ticks += 1;
            assert!(ticks < 100, "engine never finished");
        }

        // 3 rounds of 3s plus 2 breaks of 2s
        assert_eq!(ticks, 13);
        let results = engine.results();
        assert_eq!(results.len(), 3);
        for (idx, r) in results.iter().enumerate() {
            assert_eq!(r.round_number(), idx + 1);
            assert_eq!(r.answered(), r.correct() + r.incorrect());
            assert_eq!(r.correct(), 3);
        }
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0], results);
    }

    #[test]
    fn test_end_round_on_last_round_finishes() {
        let mut engine = engine();
        let calls = capture_finish(&mut engine);
        engine.start("Dewi");
        for _ in 0..2 {
            engine.end_round_now();
            engine.tick();
            engine.tick();
        }
        assert_eq!(engine.round_index(), 2);
        assert_matches!(engine.end_round_now(), Some(Transition::Finished(_)));
        assert_eq!(engine.phase(), Phase::Finished);
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0].len(), 3);
    }

    #[test]
    fn test_end_test_keeps_partial_round() {
        let mut engine = engine();
        let calls = capture_finish(&mut engine);
        engine.start("Dewi");
        answer_correctly(&mut engine);
        answer_correctly(&mut engine);
        let wrong = wrong_option(&engine);
        engine.submit_answer(wrong);

        let partial = RoundResult::new(1, 2, 1);
        assert_eq!(engine.end_test_now(), Some(Transition::Finished(partial)));
        assert_eq!(partial.answered(), 3);
        assert_eq!(engine.results(), [partial]);
        assert_eq!(*calls.borrow(), vec![vec![partial]]);
    }

    #[test]
    fn test_manual_end_then_tick_does_not_double_count() {
        let mut engine = engine();
        engine.start("Dewi");
        engine.tick();
        engine.tick();
        engine.end_round_now();
        // the round timer would have hit zero on this tick
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.results().len(), 1);
        assert_eq!(engine.phase(), Phase::Break);
    }

    #[test]
    fn test_finished_is_terminal() {
        let mut engine = engine();
        let calls = capture_finish(&mut engine);
        engine.start("Dewi");
        engine.end_test_now();

        assert_eq!(engine.start("Again"), None);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.end_round_now(), None);
        assert_eq!(engine.end_test_now(), None);
        assert_eq!(engine.submit_answer('A'), None);
        assert_eq!(engine.phase(), Phase::Finished);
        assert_eq!(engine.results().len(), 1);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut engine = engine();
        engine.start("Dewi");
        answer_correctly(&mut engine);
        engine.tick();

        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Active);
        assert_eq!(snap.round_index, 0);
        assert_eq!(snap.total_rounds, 3);
        assert_eq!(snap.seconds_remaining, 2);
        assert_eq!(snap.tally.correct, 1);
        assert!(snap.question.is_some());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Active.to_string(), "Active");
        assert_eq!(Phase::Break.to_string(), "Break");
    }
}
