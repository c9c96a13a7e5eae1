//! Error types for the Dockerfile validator.
//!
//! Validation itself never fails: structural problems are folded into a
//! score-0 report. These errors surface from the ambient layers instead
//! (configuration loading, reading input, and the external linter adapter).

use thiserror::Error;

/// Errors raised outside the rule engine.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Reading input or spawning a process failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The external linter binary could not be found or started
    #[error("External linter '{binary}' is not available: {reason}")]
    LinterUnavailable {
        /// Binary that was invoked
        binary: String,
        /// Why the spawn failed
        reason: String,
    },

    /// The external linter exited without producing a report
    #[error("External linter failed (exit code {code:?}): {stderr}")]
    LinterFailed {
        /// Process exit code, if the process exited normally
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The external linter produced output that could not be decoded
    #[error("Failed to decode external linter output: {0}")]
    LinterOutput(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document was malformed
    #[error("Failed to parse configuration: {0}")]
    ParsingFailed(String),

    /// A value was syntactically valid but not acceptable
    #[error("Invalid value for '{key}': {value}")]
    InvalidValue {
        /// Offending key
        key: String,
        /// Offending value
        value: String,
    },
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, ValidatorError>;
