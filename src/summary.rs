use chrono::{DateTime, Local};
use serde::Serialize;

use crate::analysis::{analyze, AnalysisReport, Metrics};
use crate::results::{RoundResult, Totals};

/// Everything the results screen and `--json` output show. Built once, from
/// the final result list.
#[derive(Debug, Clone, Serialize)]
pub struct TestSummary {
    pub participant: String,
    pub finished_at: DateTime<Local>,
    pub results: Vec<RoundResult>,
    pub totals: Totals,
    pub report: AnalysisReport,
    pub metrics: Metrics,
}

impl TestSummary {
    pub fn new(participant: impl Into<String>, results: Vec<RoundResult>) -> Self {
        Self {
            participant: participant.into(),
            finished_at: Local::now(),
            totals: Totals::from_results(&results),
            report: analyze(&results),
            metrics: Metrics::from_results(&results),
            results,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
