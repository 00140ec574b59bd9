//! Comparator orchestrator (spec.md §4.5).
//!
//! Owns the counters, flags, and error-pattern dataset for exactly one
//! file-pair comparison (spec.md §3 "Ownership"). Reads both files
//! whole (no streaming Non-goal, spec.md §1), runs the structure
//! analyzer on each side, then walks the files line by line feeding
//! every aligned element through the format tracker and difference
//! analyzer.

use std::fs;
use std::path::Path;

use log::{trace, warn};

use crate::difference::{self, Percent};
use crate::error::{CompareError, Result};
use crate::format_tracker::FormatTracker;
use crate::pattern::{self, ErrorSample};
use crate::structure::{self, FileStructure};
use crate::token;
use crate::types::{Counters, Flags, Maxima, PatternConstants, Thresholds, UnitMismatch, VerdictReport};
use crate::verdict;

const UNIT_RATIO_NAUTICAL_MILE_METERS: f64 = 1852.0;
const UNIT_RATIO_TOLERANCE: f64 = 0.01;

/// Opens both paths and drives a full comparison, returning the frozen
/// [`VerdictReport`]. This is the library's public entry point
/// (spec.md §6 `compare(file1, file2, thresholds)`).
pub fn compare_files(
    path1: &Path,
    path2: &Path,
    thresholds: &Thresholds,
    pattern_constants: &PatternConstants,
) -> Result<VerdictReport> {
    let text1 = fs::read_to_string(path1).map_err(|e| CompareError::io(path1, e))?;
    let text2 = fs::read_to_string(path2).map_err(|e| CompareError::io(path2, e))?;
    compare_text(&text1, &text2, thresholds, pattern_constants)
}

/// Same as [`compare_files`] but operating on in-memory text, which is
/// what the end-to-end seed tests (spec.md §8) exercise directly.
pub fn compare_text(
    text1: &str,
    text2: &str,
    thresholds: &Thresholds,
    pattern_constants: &PatternConstants,
) -> Result<VerdictReport> {
    let lines1: Vec<&str> = text1.lines().collect();
    let lines2: Vec<&str> = text2.lines().collect();

    let mut struct1 = structure::analyze_structure(&lines1);
    let mut struct2 = structure::analyze_structure(&lines2);
    struct1.column1_is_range_data = detect_range_column(&lines1, &struct1);
    struct2.column1_is_range_data = detect_range_column(&lines2, &struct2);
    let range_column = struct1.column1_is_range_data && struct2.column1_is_range_data;

    let mut counters = Counters::default();
    let mut maxima = Maxima::default();
    let mut flags = Flags::default();
    flags.column1_is_range_data = range_column;
    flags.length_mismatch = lines1.len() != lines2.len();
    flags.structure_mismatch = !structure::structures_compatible(&struct1, &struct2);

    if flags.length_mismatch {
        let err = CompareError::LineCountMismatch {
            lines1: lines1.len(),
            lines2: lines2.len(),
        };
        warn!("{err}");
    }

    let mut tracker = FormatTracker::new();
    let mut error_samples: Vec<ErrorSample> = Vec::new();
    let mut unit_checked = false;

    let line_count = lines1.len().min(lines2.len());
    for i in 0..line_count {
        let line_no = i + 1;
        let parsed1 = token::parse_line(lines1[i], line_no);
        let parsed2 = token::parse_line(lines2[i], line_no);

        if let Ok(Some(rec)) = &parsed1 {
            check_short_line(&struct1, line_no, rec.len(), &mut flags);
        }
        if let Ok(Some(rec)) = &parsed2 {
            check_short_line(&struct2, line_no, rec.len(), &mut flags);
        }

        let (rec1, rec2) = match (parsed1, parsed2) {
            (Ok(None), Ok(None)) => continue,
            (Ok(Some(r1)), Ok(Some(r2))) => (r1, r2),
            (Ok(None), Ok(Some(_))) | (Ok(Some(_)), Ok(None)) => {
                flags.structure_mismatch = true;
                continue;
            }
            (Err(CompareError::NotNumeric { .. }), Err(CompareError::NotNumeric { .. })) => {
                // Matching text/header lines on both sides, per spec.md §9's
                // numeric-header resolution: no elements contributed.
                continue;
            }
            (Err(CompareError::NotNumeric { .. }), _) | (_, Err(CompareError::NotNumeric { .. })) => {
                flags.structure_mismatch = true;
                continue;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("line {line_no}: {e}");
                flags.parse_failed = true;
                continue;
            }
        };

        if rec1.len() != rec2.len() {
            let err = CompareError::ColumnCountMismatch {
                line: line_no,
                cols1: rec1.len(),
                cols2: rec2.len(),
            };
            warn!("{err}");
            flags.structure_mismatch = true;
            continue;
        }

        let column_count = rec1.len();
        let range_value = rec1.values[0];

        if !unit_checked && column_count > 0 && rec1.values[0] != rec2.values[0] {
            unit_checked = true;
            if let Some(mismatch) = detect_unit_mismatch(line_no, rec1.values[0], rec2.values[0]) {
                flags.unit_mismatch = Some(mismatch);
            }
        }

        let mut line_has_printed_diff = false;

        for c in 0..column_count {
            let v1 = rec1.values[c];
            let v2 = rec2.values[c];
            let (min_dp, new_fmt) = tracker.observe(column_count, c, rec1.decimals[c], rec2.decimals[c]);
            if new_fmt {
                trace!("line {line_no} col {c}: format change, min_dp={min_dp}");
            }
            let skip_tl = c == 0 && range_column;

            let outcome = difference::classify_element(v1, v2, min_dp, skip_tl, thresholds);
            trace!("line {line_no} col {c}: {:?}", outcome.classification);

            counters.record(outcome.classification, outcome.is_high_ignore);
            fold_maxima(&mut maxima, &outcome, min_dp);

            if outcome.classification == crate::types::Classification::Critical
                && !flags.has_critical_diff
            {
                flags.has_critical_diff = true;
                warn!("line {line_no} col {c}: critical difference (raw={})", outcome.raw);
            }

            if outcome.classification != crate::types::Classification::Zero
                && outcome.raw >= thresholds.print
            {
                line_has_printed_diff = true;
            }

            if crate::types::IGNORE >= v1 && crate::types::IGNORE >= v2 {
                error_samples.push(ErrorSample {
                    range: range_value,
                    error: v1 - v2,
                });
            }
        }

        if line_has_printed_diff {
            counters.diff_printed += 1;
        }
    }

    flags.files_are_same = !counters.has_non_zero();
    flags.files_have_same_values = !counters.has_non_trivial();

    let pattern_analysis = pattern::analyze(&error_samples, pattern_constants).ok();
    let outcome = verdict::compute_verdict(&counters, &flags, pattern_analysis.as_ref());

    Ok(VerdictReport {
        counters,
        maxima,
        flags,
        pattern: pattern_analysis,
        pass: outcome.pass,
        reasons: outcome.reasons,
    })
}

fn fold_maxima(maxima: &mut Maxima, outcome: &difference::ElementOutcome, min_dp: i32) {
    use crate::types::Classification::*;
    match outcome.classification {
        Zero => {}
        Trivial => {
            maxima.observe_non_zero(outcome.raw, min_dp);
        }
        Insignificant => {
            maxima.observe_non_zero(outcome.raw, min_dp);
            maxima.observe_non_trivial(outcome.raw, min_dp);
        }
        Marginal | Critical | Error | NonError => {
            maxima.observe_non_zero(outcome.raw, min_dp);
            maxima.observe_non_trivial(outcome.raw, min_dp);
            maxima.observe_significant(outcome.raw, min_dp);
        }
    }
    match outcome.percent {
        Percent::Finite(p) => maxima.observe_percent(Some(p)),
        Percent::Infinite => maxima.observe_percent(None),
        Percent::NotApplicable => {}
    }
}

/// Detects the ~1852 unit-scale mismatch (nautical miles vs. meters)
/// on the first line where column 0 differs between the two files
/// (spec.md §4.5). Purely diagnostic — never alters counters.
fn detect_unit_mismatch(line: usize, v1: f64, v2: f64) -> Option<UnitMismatch> {
    if v2 == 0.0 {
        return None;
    }
    let r = v1 / v2;
    let forward = ((r - UNIT_RATIO_NAUTICAL_MILE_METERS) / UNIT_RATIO_NAUTICAL_MILE_METERS).abs();
    let backward = if r != 0.0 {
        ((1.0 / r - UNIT_RATIO_NAUTICAL_MILE_METERS) / UNIT_RATIO_NAUTICAL_MILE_METERS).abs()
    } else {
        f64::INFINITY
    };
    if forward < UNIT_RATIO_TOLERANCE || backward < UNIT_RATIO_TOLERANCE {
        Some(UnitMismatch { line, ratio: r })
    } else {
        None
    }
}

/// Flags a line whose numeric column count falls short of the file's
/// already-established data-column count (the structure analyzer's
/// modal column count, computed in its first pass over the whole file
/// before this line is ever reached) — spec.md §4.1's `ShortLine` edge
/// case. Lines that fail to parse as numeric at all (genuine text
/// headers) never reach this check.
fn check_short_line(structure: &FileStructure, line_no: usize, found: usize, flags: &mut Flags) {
    let expected = structure.mode_column_count;
    if expected > 0 && found > 0 && found < expected {
        let err = CompareError::ShortLine {
            line: line_no,
            expected,
            found,
        };
        warn!("{err}");
        flags.short_line = true;
    }
}

/// Gathers column-0 values across the file's data group(s) (the groups
/// the structure analyzer did *not* mark as headers) and runs the
/// range-column heuristic over them in file order.
fn detect_range_column(lines: &[&str], structure: &FileStructure) -> bool {
    let mut column0: Vec<f64> = Vec::new();
    for group in &structure.groups {
        if group.is_header {
            continue;
        }
        for line_no in group.start_line..=group.end_line {
            let Some(line) = lines.get(line_no - 1) else {
                continue;
            };
            if let Ok(Some(rec)) = token::parse_line(line, line_no) {
                if let Some(&v0) = rec.values.first() {
                    column0.push(v0);
                }
            }
        }
    }
    structure::detect_range_column(&column0)
}
