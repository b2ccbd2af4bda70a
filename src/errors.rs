//! Unified error types for loghound
//!
//! Everything that can go wrong during ingestion or configuration is a
//! variant here. The detection core itself is total: degenerate input is
//! modeled as a verdict, never as an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoghoundError {
    #[error("malformed record at line {line_no}: {reason}")]
    MalformedRecord { line_no: usize, reason: String },

    #[error("unknown event category at line {line_no}: {token:?}")]
    UnknownCategory { line_no: usize, token: String },

    #[error("invalid transfer size at line {line_no}: {value:?}")]
    InvalidSize { line_no: usize, value: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoghoundError {
    /// Whether this error came from a single bad input line, as opposed to
    /// a configuration or I/O failure. Per-record errors are recoverable by
    /// the ingestion layer (skip-and-continue); the rest are not.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            LoghoundError::MalformedRecord { .. }
                | LoghoundError::UnknownCategory { .. }
                | LoghoundError::InvalidSize { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LoghoundError>;
