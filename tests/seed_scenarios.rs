//! End-to-end seed scenarios (spec.md §8), driven through real files
//! via `tempfile` the way the rest of the pack tests file-reading entry
//! points on disk rather than in-memory fixtures.

use std::io::Write;

use tempfile::NamedTempFile;
use tlcompare::{compare, Thresholds, UserThreshold};

fn write_file(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp file");
    write!(f, "{contents}").expect("write temp file");
    f
}

fn default_thresholds() -> Thresholds {
    Thresholds {
        user: UserThreshold::Absolute(0.05),
        critical: 10.0,
        print: 1.0,
    }
}

#[test]
fn scenario_1_identical_files_2x2() {
    let f1 = write_file("1.0 2.0\n3.0 4.0\n");
    let f2 = write_file("1.0 2.0\n3.0 4.0\n");

    let report = compare(f1.path(), f2.path(), &default_thresholds()).unwrap();

    assert!(report.pass);
    assert_eq!(report.counters.elem_total, 4);
    assert_eq!(report.counters.diff_non_zero, 0);
    assert_eq!(report.counters.diff_trivial, 0);
    assert_eq!(report.counters.diff_significant, 0);
}

#[test]
fn scenario_2_pure_sub_lsb() {
    let f1 = write_file("30.8");
    let f2 = write_file("30.85");
    let thresholds = Thresholds {
        user: UserThreshold::Absolute(0.0),
        ..default_thresholds()
    };

    let report = compare(f1.path(), f2.path(), &thresholds).unwrap();

    assert_eq!(report.counters.diff_non_zero, 1);
    assert_eq!(report.counters.diff_trivial, 1);
    assert_eq!(report.counters.diff_non_trivial, 0);
    assert!(report.pass);
}

#[test]
fn scenario_4_percent_mode_fails_above_1pct() {
    let f1 = write_file("101.5");
    let f2 = write_file("100.0");
    let thresholds = Thresholds {
        user: UserThreshold::Percent(0.01),
        ..default_thresholds()
    };

    let report = compare(f1.path(), f2.path(), &thresholds).unwrap();

    assert!(report.counters.has_significant());
    assert!(!report.pass);
}

#[test]
fn scenario_5_near_zero_reference_is_infinite_percent() {
    let f1 = write_file("0.5");
    let f2 = write_file("0.0");
    let thresholds = Thresholds {
        user: UserThreshold::Percent(0.01),
        ..default_thresholds()
    };

    let report = compare(f1.path(), f2.path(), &thresholds).unwrap();

    assert!(report.counters.has_significant());
    assert!(!report.pass);
    assert!(report.maxima.percent_error_is_infinite);
}

#[test]
fn scenario_6_critical_difference_continues_and_fails() {
    // Line 1 is a clean match; line 2 has a critical difference (raw >
    // critical_threshold, both values below IGNORE). Both lines must
    // still be counted.
    let f1 = write_file("1.0 50.0\n2.0 50.0\n");
    let f2 = write_file("1.0 50.0\n2.0 75.0\n");

    let report = compare(f1.path(), f2.path(), &default_thresholds()).unwrap();

    assert!(report.flags.has_critical_diff);
    assert_eq!(report.counters.diff_non_zero, 1);
    assert_eq!(report.counters.elem_total, 4);
    assert!(!report.pass);
}

#[test]
fn scenario_7_unit_scale_mismatch() {
    let f1 = write_file("1852.0 1.0\n3704.0 1.0\n5556.0 1.0\n");
    let f2 = write_file("1.0 1.0\n2.0 1.0\n3.0 1.0\n");

    let report = compare(f1.path(), f2.path(), &default_thresholds()).unwrap();

    let mismatch = report.flags.unit_mismatch.expect("expected a unit mismatch");
    assert_eq!(mismatch.line, 1);
    assert!((mismatch.ratio - 1852.0).abs() < 1.0);
}

/// A smaller-scale analogue of spec.md §8 scenario 3 ("canonical
/// pe.std1"): a handful of trivial, high-ignore, marginal, and
/// ordinary-significant differences in one file pair, exercising every
/// non-zero bucket at once rather than the exact 353x11 data.
#[test]
fn multi_category_difference_mix() {
    let f1 = write_file(concat!(
        "0.0 10.00 150.00 111.0\n",
        "1.0 10.00 150.00 50.0\n",
    ));
    let f2 = write_file(concat!(
        "0.0 10.003 150.40 115.0\n", // col1 trivial, col2 high-ignore, col3 marginal
        "1.0 10.00 150.00 55.0\n",   // col1/col2 zero, col3 ordinary significant
    ));

    let report = compare(f1.path(), f2.path(), &default_thresholds()).unwrap();

    assert!(report.counters.diff_trivial >= 1);
    assert!(report.counters.diff_high_ignore >= 1);
    assert!(report.counters.diff_marginal >= 1);
    assert!(report.counters.has_error());

    let c = &report.counters;
    // non_zero = trivial + non_trivial (spec.md §8 invariant)
    assert_eq!(c.diff_non_zero, c.diff_trivial + c.diff_non_trivial);
    // non_trivial = insignificant + significant
    assert_eq!(
        c.diff_non_trivial,
        c.diff_insignificant + c.diff_significant
    );
    // significant = marginal + critical + error + non_error
    assert_eq!(
        c.diff_significant,
        c.diff_marginal + c.diff_critical + c.diff_error + c.diff_non_error
    );
}

#[test]
fn idempotence_law_holds_for_any_file() {
    let text = "10.123 20.456 (1.0, 2.0)\n30.0 40.0 (3.0, 4.0)\n";
    let f1 = write_file(text);
    let f2 = write_file(text);

    let report = compare(f1.path(), f2.path(), &default_thresholds()).unwrap();

    assert!(report.pass);
    assert_eq!(report.counters.diff_non_zero, 0);
    assert_eq!(report.counters.elem_total, 8);
}

#[test]
fn structure_mismatch_fails_regardless_of_counters() {
    let f1 = write_file("1.0 2.0 3.0\n");
    let f2 = write_file("1.0 2.0\n");

    let report = compare(f1.path(), f2.path(), &default_thresholds()).unwrap();

    assert!(!report.pass);
}
