use thiserror::Error;

/// Rejections raised while validating a [`crate::config::TestConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("total rounds must be at least 1")]
    NoRounds,

    #[error("round duration must be at least 1 second")]
    ZeroRoundDuration,

    #[error("break duration must be at least 1 second")]
    ZeroBreakDuration,

    #[error("questions per round must be at least 1")]
    NoQuestions,

    #[error("options per question must be at least 2, got {0}")]
    TooFewOptions(usize),

    #[error("template list is empty")]
    NoTemplates,

    #[error("template #{0} is empty")]
    EmptyTemplate(usize),

    #[error("template {template:?} contains {found:?}, which is outside the alphabet")]
    InvalidTemplateChar { template: String, found: char },

    #[error("template {template:?} leaves {available} distractors, {needed} needed")]
    NotEnoughDistractors {
        template: String,
        available: usize,
        needed: usize,
    },
}

#[derive(Debug, Error)]
pub enum CermatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to initialise logging: {0}")]
    Telemetry(String),
}

pub type Result<T> = std::result::Result<T, CermatError>;
