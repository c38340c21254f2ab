//! Error type for the command-line front end.

use std::io;

use thiserror::Error;

use ligature_guard::GuardError;

use crate::config::SettingsError;

/// Everything [`run`](crate::run) can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
