//! Subcommand implementations.
//!
//! Each command makes its backend calls, then renders either text lines or
//! the raw JSON through [`Output`].

pub mod history;
pub mod price;
pub mod summary;
pub mod track;

use std::io::Write;

use laundry_core::PeriodError;
use laundry_web::api::ApiError;
use laundry_web::config::ConfigError;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Invalid backend settings.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Invalid month or year arguments.
    #[error("Invalid period: {0}")]
    Period(#[from] PeriodError),

    /// Writing to stdout failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where command results go.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or `lines` as text.
    pub fn emit<T: Serialize>(&self, value: &T, lines: &[String]) -> Result<(), CommandError> {
        let mut stdout = std::io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        } else {
            for line in lines {
                writeln!(stdout, "{line}")?;
            }
        }
        Ok(())
    }
}
