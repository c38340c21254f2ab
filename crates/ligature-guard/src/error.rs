//! Error types for engine operations.

use std::io;

use thiserror::Error;

use ligature_guard_config::ParseError;

/// The main error type for ligature-guard operations.
///
/// The `Config` variant keeps the normalized configuration text next to the
/// diagnostics, since their spans point into it.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Config { err: ParseError, src: String },
}

impl GuardError {
    /// Create a new `Config` error with the text its spans refer to.
    pub fn new_config_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Config {
            err,
            src: src.into(),
        }
    }
}
