// src/error.rs
//! Typed errors for the profiling engine.

use thiserror::Error;

/// A segment code that does not decode. Always fatal for a run: it means the
/// upstream extraction handed us corrupt data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("'{0}' is not a segment code (expected a letter A-M followed by two digits)")]
    Pattern(String),

    #[error("segment code '{code}' has class number {number}, must be under 50")]
    NumberOutOfRange { code: String, number: u8 },
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, ProfilerError>;

#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("invalid setting {key} = '{value}': {reason}")]
    Setting {
        key: String,
        value: String,
        reason: String,
    },

    #[error("transaction table: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
