// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds terminal setup and argument parsing.
pub mod analysis;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod error;
pub mod question;
pub mod results;
pub mod runtime;
pub mod summary;
pub mod telemetry;
pub mod ui;
pub mod util;

pub use analysis::{analyze, AnalysisReport, Level, Metrics, PerformanceAspect};
pub use config::TestConfig;
pub use engine::{Command, Phase, RoundEngine, Snapshot, Transition};
pub use question::Question;
pub use results::{RoundResult, Tally, Totals};
