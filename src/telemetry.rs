//! Tracing setup.
//!
//! The terminal UI owns stdout, so log lines go to a file instead:
//! - `CERMAT_LOG` controls the filter (e.g. "debug" or "info,cermat::engine=trace").
//! - The file is appended to; ANSI colouring is disabled.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{CermatError, Result};

pub const LOG_ENV: &str = "CERMAT_LOG";

pub fn init_tracing(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| CermatError::Telemetry(e.to_string()))
}
