//! Verdict engine (spec.md §4.7).
//!
//! Turns the frozen counters/flags/pattern of one comparison into the
//! boolean pass/fail verdict, applying the 2%/10% rule and the
//! `TRANSIENT_SPIKES` override.

use crate::pattern::{ErrorPattern, PatternAnalysis};
use crate::types::{Counters, Flags};

/// Percentage of elements above which a comparison fails outright
/// unless the `TRANSIENT_SPIKES` override applies.
const FAIL_THRESHOLD_PCT: f64 = 2.0;

/// Upper bound on the `TRANSIENT_SPIKES` pass-with-caveat override
/// (spec.md §9 Open Question: hardcoded, not yet exposed as config).
const TRANSIENT_SPIKES_CAP_PCT: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct VerdictOutcome {
    pub pass: bool,
    pub reasons: Vec<String>,
    pub significant_pct: f64,
}

pub fn compute_verdict(
    counters: &Counters,
    flags: &Flags,
    pattern: Option<&PatternAnalysis>,
) -> VerdictOutcome {
    let mut reasons = Vec::new();

    if flags.structure_mismatch {
        reasons.push("column-group structure differs between files".to_string());
    }
    if flags.length_mismatch {
        reasons.push("files have different line counts".to_string());
    }
    if flags.structure_mismatch || flags.length_mismatch {
        return VerdictOutcome {
            pass: false,
            reasons,
            significant_pct: 0.0,
        };
    }

    if flags.has_critical_diff {
        reasons.push("critical difference found".to_string());
        return VerdictOutcome {
            pass: false,
            reasons,
            significant_pct: 0.0,
        };
    }

    let non_marginal_non_critical_significant = counters
        .diff_significant
        .saturating_sub(counters.diff_marginal)
        .saturating_sub(counters.diff_critical);
    let pct = if counters.elem_total > 0 {
        100.0 * non_marginal_non_critical_significant as f64 / counters.elem_total as f64
    } else {
        0.0
    };

    if pct > FAIL_THRESHOLD_PCT {
        if let Some(pat) = pattern {
            if pat.pattern == ErrorPattern::TransientSpikes && pct <= TRANSIENT_SPIKES_CAP_PCT {
                reasons.push(format!(
                    "{:.2}% significant differences, passed under the TRANSIENT_SPIKES caveat (<= {:.0}%)",
                    pct, TRANSIENT_SPIKES_CAP_PCT
                ));
                return VerdictOutcome {
                    pass: true,
                    reasons,
                    significant_pct: pct,
                };
            }
        }
        reasons.push(format!(
            "{:.2}% significant differences exceeds the {:.0}% threshold",
            pct, FAIL_THRESHOLD_PCT
        ));
        return VerdictOutcome {
            pass: false,
            reasons,
            significant_pct: pct,
        };
    }

    if pct > 0.0 {
        reasons.push(format!(
            "{:.2}% significant differences, within the {:.0}% threshold",
            pct, FAIL_THRESHOLD_PCT
        ));
        if let Some(pat) = pattern {
            if pat.pattern == ErrorPattern::TransientSpikes {
                reasons.push("TRANSIENT_SPIKES pattern detected (no caveat needed)".to_string());
            }
        }
    } else {
        reasons.push("no significant differences".to_string());
    }

    VerdictOutcome {
        pass: true,
        reasons,
        significant_pct: pct,
    }
}
