//! Error taxonomy for the comparison engine (spec.md §7).
//!
//! `CriticalDifference` is deliberately absent here: spec.md calls a
//! critical element "informational, not a fault" and processing must
//! continue past it, so it is tracked as `Flags::has_critical_diff`
//! rather than raised as an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid decimal count {count} (must be 0..=17)")]
    InvalidDecimalCount { line: usize, count: i32 },

    #[error("line {line}: malformed complex literal {token:?}")]
    MalformedComplex { line: usize, token: String },

    #[error("line {line}: non-numeric token {token:?}")]
    NotNumeric { line: usize, token: String },

    #[error("line {line}: expected at least {expected} columns, found {found}")]
    ShortLine {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("files have different line counts: {lines1} vs {lines2}")]
    LineCountMismatch { lines1: usize, lines2: usize },

    #[error("line {line}: column count mismatch ({cols1} vs {cols2})")]
    ColumnCountMismatch {
        line: usize,
        cols1: usize,
        cols2: usize,
    },

    #[error("internal invariant violated: {0}")]
    Contract(String),
}

impl CompareError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompareError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
