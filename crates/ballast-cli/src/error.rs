//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read or parsed.
    #[error("Configuration error in {path}: {reason}")]
    Config {
        /// File that failed.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Input data file could not be read or parsed.
    #[error("Invalid input file {path}: {reason}")]
    InputFile {
        /// File that failed.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },
}

impl CliError {
    /// Creates an input file error.
    pub fn input_file(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InputFile {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
