use serde::Serialize;

/// Outcome of one finished round. Built once, when the round ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    round_number: usize,
    answered: u32,
    correct: u32,
    incorrect: u32,
}

impl RoundResult {
    /// `round_number` is 1-based.
    pub fn new(round_number: usize, correct: u32, incorrect: u32) -> Self {
        Self {
            round_number,
            answered: correct + incorrect,
            correct,
            incorrect,
        }
    }

    pub fn round_number(&self) -> usize {
        self.round_number
    }

    pub fn answered(&self) -> u32 {
        self.answered
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }
}

/// Running count of answers in the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: u32,
    pub incorrect: u32,
}

impl Tally {
    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    pub fn into_result(self, round_number: usize) -> RoundResult {
        RoundResult::new(round_number, self.correct, self.incorrect)
    }
}

/// Sums across all rounds, shown above the per-round breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub answered: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl Totals {
    pub fn from_results(results: &[RoundResult]) -> Self {
        results.iter().fold(Self::default(), |acc, r| Self {
            answered: acc.answered + r.answered(),
            correct: acc.correct + r.correct(),
            incorrect: acc.incorrect + r.incorrect(),
        })
    }
}
