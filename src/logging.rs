//! Tracing subscriber setup.
//!
//! `$TMF_LOG` takes precedence over the configured level. Interactive mode
//! never logs to the terminal it draws on: without a log file it stays silent.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

/// Environment variable holding a filter directive, e.g. `treemap_filter=debug`.
pub const LOG_ENV: &str = "TMF_LOG";

/// Build the filter from `$TMF_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber.
pub fn init(level: &str, file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = env_filter(level);

    match file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| AppError::Logging(e.to_string()))
        }
        None if interactive => Ok(()),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| AppError::Logging(e.to_string())),
    }
}
