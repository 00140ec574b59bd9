//! Six-level difference analyzer (spec.md §4.4) — the core classifier.
//!
//! `classify_element` is pure: given one aligned value pair and the
//! context the format tracker and structure analyzer have already
//! derived, it returns a [`Classification`] plus the raw/percent
//! figures the comparator folds into counters and maxima. No counter
//! or flag state lives here; ownership of that stays with the
//! comparator (spec.md §3 "Ownership").

use crate::types::{Classification, Thresholds, UserThreshold, IGNORE, MARGINAL, ZERO};

/// Percent-error figure for one element: not every classification
/// tracks it (spec.md §4.4 only defines it for non-trivial elements),
/// and a near-zero reference value yields an unbounded ratio rather
/// than a finite one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percent {
    NotApplicable,
    Finite(f64),
    Infinite,
}

#[derive(Debug, Clone, Copy)]
pub struct ElementOutcome {
    pub classification: Classification,
    pub raw: f64,
    pub percent: Percent,
    pub is_high_ignore: bool,
}

/// Rounds `value` to `decimals` places using round-half-away-from-zero
/// (spec.md §9) — deliberately not `f64::round`'s platform-dependent
/// cousin, so two builds agree at the exact half-LSB boundary.
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let scaled = value * scale;
    let rounded = if scaled >= 0.0 {
        (scaled + 0.5).floor()
    } else {
        -((-scaled + 0.5).floor())
    };
    rounded / scale
}

/// Shared significance rule used by both Level 3 (insignificant vs.
/// significant) and Level 6 (error vs. non-error): spec.md §4.4 calls
/// out that Level 6 reuses "the same rule as Level 3".
fn exceeds_user_threshold(raw: f64, v2: f64, threshold: UserThreshold) -> bool {
    match threshold {
        UserThreshold::Percent(fraction) => {
            if v2.abs() <= ZERO {
                // conservative: a vanishing reference can't mask a real difference
                true
            } else {
                raw / v2.abs() > fraction
            }
        }
        UserThreshold::Absolute(t) => {
            if t == 0.0 {
                // sensitive mode: anything not high-ignored is significant
                true
            } else {
                raw > t
            }
        }
    }
}

fn percent_of(raw: f64, v2: f64) -> Percent {
    if v2.abs() > ZERO {
        Percent::Finite(100.0 * raw / v2.abs())
    } else {
        Percent::Infinite
    }
}

/// Classifies one aligned element pair through the six-level
/// hierarchy. `skip_tl` is true for column 0 of a detected range
/// column (spec.md §3 marks this to suppress TL-specific thresholds).
pub fn classify_element(
    v1: f64,
    v2: f64,
    min_dp: i32,
    skip_tl: bool,
    thresholds: &Thresholds,
) -> ElementOutcome {
    let raw = (v1 - v2).abs();

    // Level 1 — zero vs. non-zero.
    if raw <= ZERO {
        return ElementOutcome {
            classification: Classification::Zero,
            raw,
            percent: Percent::NotApplicable,
            is_high_ignore: false,
        };
    }

    // Level 2 — trivial vs. non-trivial.
    let lsb = 10f64.powi(-min_dp);
    let half_lsb = lsb / 2.0;
    let r1 = round_to_decimals(v1, min_dp);
    let r2 = round_to_decimals(v2, min_dp);
    let rounded_diff = (r1 - r2).abs();
    let is_trivial = rounded_diff == 0.0
        || raw < half_lsb
        || (raw - half_lsb).abs() < 1e-12 * raw.max(half_lsb);

    if is_trivial {
        return ElementOutcome {
            classification: Classification::Trivial,
            raw,
            percent: Percent::NotApplicable,
            is_high_ignore: false,
        };
    }

    let percent = percent_of(raw, v2);

    // Level 3 — insignificant vs. significant.
    let high_ignore = !skip_tl && v1 > IGNORE && v2 > IGNORE;
    let below_user_threshold = !exceeds_user_threshold(raw, v2, thresholds.user);
    if high_ignore || below_user_threshold {
        return ElementOutcome {
            classification: Classification::Insignificant,
            raw,
            percent,
            is_high_ignore: high_ignore,
        };
    }

    // Level 4 — marginal vs. non-marginal.
    let marginal = !skip_tl
        && v1 > MARGINAL
        && v1 < IGNORE
        && v2 > MARGINAL
        && v2 < IGNORE;
    if marginal {
        return ElementOutcome {
            classification: Classification::Marginal,
            raw,
            percent,
            is_high_ignore: false,
        };
    }

    // Level 5 — critical vs. non-critical.
    let critical = !skip_tl && raw > thresholds.critical && v1 <= IGNORE && v2 <= IGNORE;
    if critical {
        return ElementOutcome {
            classification: Classification::Critical,
            raw,
            percent,
            is_high_ignore: false,
        };
    }

    // Level 6 — error vs. non-error, reusing the Level 3 rule.
    let classification = if exceeds_user_threshold(raw, v2, thresholds.user) {
        Classification::Error
    } else {
        Classification::NonError
    };
    ElementOutcome {
        classification,
        raw,
        percent,
        is_high_ignore: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Thresholds;

    fn thresholds(user: UserThreshold, critical: f64) -> Thresholds {
        Thresholds {
            user,
            critical,
            print: 1.0,
        }
    }

    #[test]
    fn identical_values_are_zero() {
        let out = classify_element(1.0, 1.0, 2, false, &thresholds(UserThreshold::Absolute(0.05), 10.0));
        assert_eq!(out.classification, Classification::Zero);
    }

    #[test]
    fn sub_lsb_difference_is_trivial() {
        // "30.8" vs "30.85": min_dp = 1 (coarser side), half_lsb = 0.05
        let out = classify_element(30.8, 30.85, 1, false, &thresholds(UserThreshold::Absolute(0.0), 10.0));
        assert_eq!(out.classification, Classification::Trivial);
    }

    #[test]
    fn sub_lsb_symmetry_law() {
        let min_dp = 1;
        let half_lsb = 10f64.powi(-min_dp) / 2.0;
        let a = 3.1;
        let b = a + half_lsb * 0.999;
        let out = classify_element(a, b, min_dp, false, &thresholds(UserThreshold::Absolute(0.0), 10.0));
        assert_eq!(out.classification, Classification::Trivial);
    }

    #[test]
    fn high_ignore_pair_is_insignificant() {
        let out = classify_element(
            IGNORE + 0.001,
            IGNORE + 0.5,
            6,
            false,
            &thresholds(UserThreshold::Absolute(0.0), 10.0),
        );
        assert_eq!(out.classification, Classification::Insignificant);
        assert!(out.is_high_ignore);
    }

    #[test]
    fn marginal_band_below_ignore() {
        let out = classify_element(
            MARGINAL + 1.0,
            MARGINAL + 1.5,
            6,
            false,
            &thresholds(UserThreshold::Absolute(0.0), 10.0),
        );
        assert_eq!(out.classification, Classification::Marginal);
    }

    #[test]
    fn critical_requires_both_below_ignore() {
        let out = classify_element(50.0, 70.0, 6, false, &thresholds(UserThreshold::Absolute(0.0), 10.0));
        assert_eq!(out.classification, Classification::Critical);
    }

    #[test]
    fn critical_suppressed_by_range_column() {
        let out = classify_element(50.0, 70.0, 6, true, &thresholds(UserThreshold::Absolute(0.0), 10.0));
        assert_ne!(out.classification, Classification::Critical);
    }

    #[test]
    fn percent_mode_near_zero_reference_is_significant_with_infinite_pct() {
        let out = classify_element(0.5, 0.0, 6, false, &thresholds(UserThreshold::Percent(0.01), 10.0));
        assert_ne!(out.classification, Classification::Insignificant);
        assert_eq!(out.percent, Percent::Infinite);
    }

    #[test]
    fn percent_mode_1pct_threshold() {
        let out = classify_element(101.5, 100.0, 6, false, &thresholds(UserThreshold::Percent(0.01), 10.0));
        assert!(matches!(
            out.classification,
            Classification::Error | Classification::NonError
        ));
    }

    #[test]
    fn sensitive_mode_every_non_trivial_is_significant_or_error() {
        let out = classify_element(1.0, 1.001, 2, false, &thresholds(UserThreshold::Absolute(0.0), 10.0));
        assert!(!matches!(
            out.classification,
            Classification::Zero | Classification::Trivial | Classification::Insignificant
        ));
    }

    #[test]
    fn threshold_monotonicity_significant_to_insignificant_only() {
        let low = classify_element(10.0, 10.2, 4, false, &thresholds(UserThreshold::Absolute(0.05), 10.0));
        let high = classify_element(10.0, 10.2, 4, false, &thresholds(UserThreshold::Absolute(1.0), 10.0));
        let was_significant = !matches!(
            low.classification,
            Classification::Zero | Classification::Trivial | Classification::Insignificant
        );
        let still_significant = !matches!(
            high.classification,
            Classification::Zero | Classification::Trivial | Classification::Insignificant
        );
        assert!(!(still_significant && !was_significant));
    }
}
