//! tlcompare - numeric comparison engine for transmission-loss and other
//! tabular acoustic-simulator outputs.
//!
//! Compares two whitespace-delimited ASCII tables element-by-element
//! through a six-level discrimination hierarchy (zero, trivial,
//! insignificant, marginal, critical, error/non-error) and an
//! error-pattern analyzer, producing a pass/fail [`VerdictReport`].

pub mod comparator;
pub mod difference;
pub mod error;
pub mod format_tracker;
pub mod pattern;
pub mod report;
pub mod structure;
pub mod token;
pub mod types;
pub mod verdict;

use std::path::Path;

pub use comparator::compare_files;
pub use error::{CompareError, Result};
pub use types::{Counters, Flags, Maxima, PatternConstants, Thresholds, UserThreshold, VerdictReport};

/// Convenience entry point matching spec.md §6's `compare(file1, file2,
/// thresholds) -> VerdictReport` collaborator contract, using the
/// default [`PatternConstants`].
pub fn compare(path1: &Path, path2: &Path, thresholds: &Thresholds) -> Result<VerdictReport> {
    comparator::compare_files(path1, path2, thresholds, &PatternConstants::default())
}
