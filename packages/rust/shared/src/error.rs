//! Error types for handisync.
//!
//! Library crates use [`HandisyncError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! The taxonomy is two-tier: `Config`, `Sheets`, `Session` and `Io` are
//! fatal and abort the run; `Lookup` is per-record and is only ever
//! converted to the sentinel outcome inside the extractor loop.

use std::path::PathBuf;

/// Top-level error type for all handisync operations.
#[derive(Debug, thiserror::Error)]
pub enum HandisyncError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Spreadsheet backend error (auth, invalid range, failed batch write).
    #[error("sheets error: {0}")]
    Sheets(String),

    /// WebDriver session error (connect, login bootstrap, teardown).
    #[error("session error: {0}")]
    Session(String),

    /// Failure looking up or extracting a single member's dashboard.
    /// Recoverable: the extractor records it and moves on.
    #[error("lookup error: {message}")]
    Lookup { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HandisyncError>;

impl HandisyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a per-record lookup error from any displayable message.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
