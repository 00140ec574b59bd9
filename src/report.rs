//! Summary emitter (spec.md §1's "Summary emitter" collaborator).
//!
//! Renders a [`VerdictReport`] as a colored terminal counters table,
//! in the teacher's `display_summary_table` idiom (UTF8_FULL preset,
//! rounded corners, color-coded cells). Presentation only — computes
//! nothing and isn't used by the library's public API or its tests.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use console::style;

use crate::pattern::ErrorPattern;
use crate::types::VerdictReport;

/// Prints the pass/fail banner followed by the counters table.
pub fn print_summary(report: &VerdictReport) {
    print_banner(report);
    println!();
    print_counters_table(report);
    if let Some(unit) = &report.flags.unit_mismatch {
        println!(
            "{} line {}: column-0 ratio {:.2} suggests a unit-scale mismatch (~1852)",
            style("note:").yellow(),
            unit.line,
            unit.ratio
        );
    }
    if let Some(pattern) = &report.pattern {
        println!(
            "error pattern: {} (r\u{b2}={:.3}, slope={:.3e}, autocorr={:.3}, spike={:.2})",
            pattern_label(pattern.pattern),
            pattern.r_squared,
            pattern.slope,
            pattern.autocorrelation,
            pattern.spike_ratio
        );
    }
    if !report.reasons.is_empty() {
        println!();
        for reason in &report.reasons {
            println!("  - {reason}");
        }
    }
}

fn print_banner(report: &VerdictReport) {
    if report.pass {
        println!("{}", style("PASS").green().bold());
    } else {
        println!("{}", style("FAIL").red().bold());
    }
}

fn pattern_label(pattern: ErrorPattern) -> &'static str {
    match pattern {
        ErrorPattern::SystematicGrowth => "SYSTEMATIC_GROWTH",
        ErrorPattern::SystematicBias => "SYSTEMATIC_BIAS",
        ErrorPattern::RandomNoise => "RANDOM_NOISE",
        ErrorPattern::TransientSpikes => "TRANSIENT_SPIKES",
        ErrorPattern::NullPointNoise => "NULL_POINT_NOISE",
    }
}

fn print_counters_table(report: &VerdictReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);

    table.set_header(vec![
        Cell::new("Counter").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);

    let c = &report.counters;
    let rows: [(&str, u64, Color); 11] = [
        ("elem_total", c.elem_total, Color::White),
        ("diff_non_zero", c.diff_non_zero, Color::White),
        ("diff_trivial", c.diff_trivial, Color::White),
        ("diff_non_trivial", c.diff_non_trivial, Color::White),
        ("diff_insignificant", c.diff_insignificant, Color::White),
        ("diff_high_ignore", c.diff_high_ignore, Color::White),
        (
            "diff_significant",
            c.diff_significant,
            if c.diff_significant > 0 { Color::Yellow } else { Color::White },
        ),
        ("diff_marginal", c.diff_marginal, Color::White),
        (
            "diff_critical",
            c.diff_critical,
            if c.diff_critical > 0 { Color::Red } else { Color::White },
        ),
        ("diff_error", c.diff_error, Color::White),
        ("diff_printed", c.diff_printed, Color::White),
    ];
    for (label, value, color) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value).fg(color)]);
    }

    println!("{table}");

    if let Some(max) = &report.maxima.max_significant {
        println!("max_significant = {:.6} (min_dp={})", max.value, max.min_dp);
    }
    match (report.maxima.max_percent_error, report.maxima.percent_error_is_infinite) {
        (_, true) => println!("max_percent_error = \u{221e}"),
        (Some(p), false) => println!("max_percent_error = {p:.4}%"),
        (None, false) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Counters, Flags, Maxima};

    #[test]
    fn print_summary_does_not_panic_on_empty_report() {
        let report = VerdictReport {
            counters: Counters::default(),
            maxima: Maxima::default(),
            flags: Flags::default(),
            pattern: None,
            pass: true,
            reasons: vec!["no significant differences".to_string()],
        };
        print_summary(&report);
    }
}
