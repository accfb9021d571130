use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::ConfigError;
use crate::question::ALPHABET;

pub const TOTAL_ROUNDS: usize = 10;
pub const ROUND_DURATION_SECS: u32 = 60;
pub const BREAK_DURATION_SECS: u32 = 5;
pub const QUESTIONS_PER_ROUND: usize = 50;
pub const OPTIONS_PER_QUESTION: usize = 5;
pub const TEMPLATES: [&str; 10] = [
    "8R2KX", "M4T9B", "Q7H3Z", "5WDN1", "C6V8F", "J2S7L", "U9E4G", "P3Y6A", "T1K5R", "H8N2W",
];

/// The fixed battery a test runs with. Only [`TestConfig::default`] is used by
/// the binary; shorter batteries are built in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    pub total_rounds: usize,
    pub round_duration_secs: u32,
    pub break_duration_secs: u32,
    pub questions_per_round: usize,
    pub options_per_question: usize,
    pub templates: Vec<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            total_rounds: TOTAL_ROUNDS,
            round_duration_secs: ROUND_DURATION_SECS,
            break_duration_secs: BREAK_DURATION_SECS,
            questions_per_round: QUESTIONS_PER_ROUND,
            options_per_question: OPTIONS_PER_QUESTION,
            templates: TEMPLATES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl TestConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.round_duration_secs == 0 {
            return Err(ConfigError::ZeroRoundDuration);
        }
        if self.break_duration_secs == 0 {
            return Err(ConfigError::ZeroBreakDuration);
        }
        if self.questions_per_round == 0 {
            return Err(ConfigError::NoQuestions);
        }
        if self.options_per_question < 2 {
            return Err(ConfigError::TooFewOptions(self.options_per_question));
        }
        if self.templates.is_empty() {
            return Err(ConfigError::NoTemplates);
        }

        for (idx, template) in self.templates.iter().enumerate() {
            if template.is_empty() {
                return Err(ConfigError::EmptyTemplate(idx));
            }
            if let Some(found) = template.chars().find(|c| !ALPHABET.contains(*c)) {
                return Err(ConfigError::InvalidTemplateChar {
                    template: template.clone(),
                    found,
                });
            }

            // option drawing only terminates if enough characters sit outside the template
            let available = ALPHABET.chars().filter(|c| !template.contains(*c)).count();
            let needed = self.options_per_question - 1;
            if available < needed {
                return Err(ConfigError::NotEnoughDistractors {
                    template: template.clone(),
                    available,
                    needed,
                });
            }
        }

        Ok(())
    }

    pub fn template_for_round(&self, round_index: usize) -> &str {
        &self.templates[round_index % self.templates.len()]
    }
}

/// User preferences kept between launches. Test results are never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub last_participant: Option<String>,
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("cermat_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
