//! Post-test scoring.
//!
//! Turns the finished list of [`RoundResult`]s into four independent
//! qualitative assessments. Every function here is pure; a zero denominator
//! yields [`Level::NotApplicable`] instead of a `NaN`.

use serde::Serialize;

use crate::results::RoundResult;
use crate::util::{mean, sample_std_dev};

/// Rounds needed before endurance is judged.
pub const MIN_ROUNDS_FOR_ENDURANCE: usize = 4;

/// Qualitative band attached to an aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    #[strum(serialize = "very fast")]
    VeryFast,
    #[strum(serialize = "fast")]
    Fast,
    #[strum(serialize = "very precise")]
    VeryPrecise,
    #[strum(serialize = "precise")]
    Precise,
    #[strum(serialize = "fairly precise")]
    FairlyPrecise,
    #[strum(serialize = "very good")]
    VeryGood,
    #[strum(serialize = "good")]
    Good,
    #[strum(serialize = "very stable")]
    VeryStable,
    #[strum(serialize = "fairly stable")]
    FairlyStable,
    #[strum(serialize = "less stable")]
    LessStable,
    #[strum(serialize = "adequate")]
    Adequate,
    #[strum(serialize = "needs improvement")]
    NeedsImprovement,
    #[strum(serialize = "not applicable")]
    NotApplicable,
}

impl Level {
    /// Coarse grading used for colouring: 2 strong, 1 middling, 0 weak.
    pub fn grade(&self) -> Option<u8> {
        match self {
            Level::VeryFast
            | Level::Fast
            | Level::VeryPrecise
            | Level::Precise
            | Level::VeryGood
            | Level::Good
            | Level::VeryStable => Some(2),
            Level::FairlyPrecise | Level::FairlyStable | Level::Adequate => Some(1),
            Level::LessStable | Level::NeedsImprovement => Some(0),
            Level::NotApplicable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceAspect {
    pub level: Level,
    pub description: &'static str,
}

impl PerformanceAspect {
    fn new(level: Level, description: &'static str) -> Self {
        Self { level, description }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub speed: PerformanceAspect,
    pub accuracy: PerformanceAspect,
    pub endurance: PerformanceAspect,
    pub consistency: PerformanceAspect,
}

/// The raw numbers the bands are cut from. `None` where the matching aspect
/// is not applicable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub average_answered: f64,
    pub accuracy_pct: Option<f64>,
    pub endurance_ratio: Option<f64>,
    pub coefficient_of_variation: Option<f64>,
}

impl Metrics {
    pub fn from_results(results: &[RoundResult]) -> Self {
        let answered = answered_per_round(results);
        let (total_correct, total_answered) = totals(results);

        let endurance_ratio = halves(&answered).and_then(|(first, second)| {
            (first > 0.0).then_some(second / first)
        });

        Self {
            average_answered: mean(&answered).unwrap_or(0.0),
            accuracy_pct: accuracy_pct(total_correct, total_answered),
            endurance_ratio,
            coefficient_of_variation: coefficient_of_variation(&answered),
        }
    }
}

pub fn analyze(results: &[RoundResult]) -> AnalysisReport {
    let answered = answered_per_round(results);
    let (total_correct, total_answered) = totals(results);

    AnalysisReport {
        speed: speed(&answered),
        accuracy: accuracy(total_correct, total_answered),
        endurance: endurance(&answered),
        consistency: consistency(&answered),
    }
}

fn answered_per_round(results: &[RoundResult]) -> Vec<f64> {
    results.iter().map(|r| r.answered() as f64).collect()
}

fn totals(results: &[RoundResult]) -> (u64, u64) {
    results.iter().fold((0, 0), |(correct, answered), r| {
        (correct + r.correct() as u64, answered + r.answered() as u64)
    })
}

fn accuracy_pct(total_correct: u64, total_answered: u64) -> Option<f64> {
    (total_answered > 0).then(|| (total_correct as f64 * 100.0) / total_answered as f64)
}

/// Averages of the first `floor(n/2)` and the last `n - ceil(n/2)` rounds.
/// For odd `n` the middle round sits in neither half.
fn halves(answered: &[f64]) -> Option<(f64, f64)> {
    let n = answered.len();
    if n < MIN_ROUNDS_FOR_ENDURANCE {
        return None;
    }
    let first = mean(&answered[..n / 2])?;
    let second = mean(&answered[n.div_ceil(2)..])?;
    Some((first, second))
}

fn coefficient_of_variation(answered: &[f64]) -> Option<f64> {
    let avg = mean(answered)?;
    if avg == 0.0 {
        return None;
    }
    sample_std_dev(answered).map(|sd| sd / avg * 100.0)
}

pub fn speed(answered: &[f64]) -> PerformanceAspect {
    let Some(avg) = mean(answered) else {
        return PerformanceAspect::new(
            Level::NotApplicable,
            "No rounds were recorded to measure speed.",
        );
    };

    if avg >= 30.0 {
        PerformanceAspect::new(
            Level::VeryFast,
            "Your working speed is outstanding. You process information and answer very efficiently.",
        )
    } else if avg >= 20.0 {
        PerformanceAspect::new(
            Level::Fast,
            "Your working speed is above average, an important asset in a timed test.",
        )
    } else if avg >= 10.0 {
        PerformanceAspect::new(
            Level::Adequate,
            "Your working speed is adequate. Practice can help raise it further.",
        )
    } else {
        PerformanceAspect::new(
            Level::NeedsImprovement,
            "Your speed can still be optimised. Focus on recognising the pattern to respond faster.",
        )
    }
}

pub fn accuracy(total_correct: u64, total_answered: u64) -> PerformanceAspect {
    let Some(pct) = accuracy_pct(total_correct, total_answered) else {
        return PerformanceAspect::new(Level::NotApplicable, "No answers were recorded to analyse.");
    };

    if pct >= 95.0 {
        PerformanceAspect::new(
            Level::VeryPrecise,
            "Your precision is very high. You work quickly without sacrificing quality.",
        )
    } else if pct >= 85.0 {
        PerformanceAspect::new(
            Level::Precise,
            "You keep your precision well. Stay focused to minimise small mistakes.",
        )
    } else if pct >= 75.0 {
        PerformanceAspect::new(
            Level::FairlyPrecise,
            "Your precision is fair, with room to improve. Double-check before choosing.",
        )
    } else {
        PerformanceAspect::new(
            Level::NeedsImprovement,
            "Many mistakes were made. Try to stay calm and focus on answering correctly.",
        )
    }
}

pub fn endurance(answered: &[f64]) -> PerformanceAspect {
    let Some((first, second)) = halves(answered) else {
        return PerformanceAspect::new(
            Level::NotApplicable,
            "Not enough rounds to analyse endurance.",
        );
    };

    if second >= first * 0.95 {
        PerformanceAspect::new(
            Level::VeryGood,
            "Your endurance is excellent. You kept or even raised your performance under sustained time pressure.",
        )
    } else if second >= first * 0.85 {
        PerformanceAspect::new(
            Level::Good,
            "You have good endurance, with only a slight drop in performance over time.",
        )
    } else if second >= first * 0.75 {
        PerformanceAspect::new(
            Level::Adequate,
            "There are signs of fatigue. Your performance tends to drop in the second half of the test.",
        )
    } else {
        PerformanceAspect::new(
            Level::NeedsImprovement,
            "Your performance dropped significantly. Train concentration and stamina to keep a steady pace.",
        )
    }
}

pub fn consistency(answered: &[f64]) -> PerformanceAspect {
    let Some(cv) = coefficient_of_variation(answered) else {
        return PerformanceAspect::new(
            Level::NotApplicable,
            "Not enough answered rounds to analyse consistency.",
        );
    };

    if cv <= 15.0 {
        PerformanceAspect::new(
            Level::VeryStable,
            "Your working rhythm is very consistent, showing strong focus and composure.",
        )
    } else if cv <= 25.0 {
        PerformanceAspect::new(
            Level::FairlyStable,
            "Your working rhythm is fairly consistent, with some fluctuation between rounds.",
        )
    } else {
        PerformanceAspect::new(
            Level::LessStable,
            "Your performance tends to rise and fall. Practise keeping a steadier rhythm each round.",
        )
    }
}
