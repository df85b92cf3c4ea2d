//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Navigator
//!
//! Every module returns `Result<T, AppError>`. Recoverable variants end up in
//! the warning banner; protocol variants (`is_fatal`) terminate the process.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for all navigator operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Directory could not be listed (removed, permission denied, ...).
    #[error("Cannot read directory {path:?}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory navigation errors (chdir refused).
    #[error("Navigation failed: cannot access {path:?}: {reason}")]
    NavigationFailed { path: PathBuf, reason: String },

    /// External fuzzy filter could not be launched or talked to.
    #[error("Filter command '{program}' failed: {reason}")]
    FilterTool { program: String, reason: String },

    /// Directory command token outside the protocol.
    #[error("unknown cmd: {0}")]
    UnknownCommand(String),

    /// `:` command name that has no action.
    #[error("Command '{0}' not found")]
    UnknownAction(String),

    /// Keybinding string that cannot be parsed.
    #[error("Invalid keybinding '{binding}': {reason}")]
    InvalidKeybinding { binding: String, reason: String },

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Terminal I/O or rendering error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    #[must_use]
    /// Attach extra context to an error.
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        Self::Other(format!("{}: {}", ctx.into(), self))
    }

    /// Create a directory scan failure error
    pub fn scan_failed<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }

    /// Create a navigation failure error
    pub fn navigation_failed<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::NavigationFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a filter tool failure error
    pub fn filter_failed<S1: Into<String>, S2: Into<String>>(program: S1, reason: S2) -> Self {
        Self::FilterTool {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Create a keybinding parse error
    pub fn invalid_keybinding<S1: Into<String>, S2: Into<String>>(binding: S1, reason: S2) -> Self {
        Self::InvalidKeybinding {
            binding: binding.into(),
            reason: reason.into(),
        }
    }

    /// Protocol and configuration defects: never shown as a warning.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::UnknownCommand(_) | Self::InvalidKeybinding { .. })
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}
