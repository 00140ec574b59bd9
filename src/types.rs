//! Core data model: thresholds, counters, maxima, flags and the verdict
//! report shape.
//!
//! Mirrors the teacher's convention of a single file of plain data structs
//! with `Default` impls and `clap::ValueEnum` derives on anything the CLI
//! exposes directly.

use clap::ValueEnum;

use crate::pattern::PatternAnalysis;

/// `ZERO = 2^-23`, the smallest difference the six-level hierarchy treats
/// as non-zero. Below this, two values are considered bit-identical noise.
pub const ZERO: f64 = 1.192_092_9e-7;

/// dB threshold above which a transmission-loss value is "marginal" —
/// large enough that small absolute differences stop mattering.
pub const MARGINAL: f64 = 110.0;

/// dB threshold above which both values are so attenuated that
/// differences between them are ignored outright.
pub const IGNORE: f64 = 138.473_798_0;

/// Debug verbosity, replacing the legacy integer debug-level knob
/// (spec.md §9 redesign note) with a structured three-level enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum DebugLevel {
    #[default]
    Info,
    Debug,
    Trace,
}

impl DebugLevel {
    /// Maps to the `env_logger` filter the CLI initializes with.
    pub fn filter(self) -> &'static str {
        match self {
            DebugLevel::Info => "warn",
            DebugLevel::Debug => "debug",
            DebugLevel::Trace => "trace",
        }
    }
}

/// The user-supplied significance threshold. A negative raw CLI value
/// selects percent mode (spec.md §6); zero selects "sensitive mode",
/// where every non-trivial, non-high-ignore difference is significant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserThreshold {
    Absolute(f64),
    Percent(f64),
}

impl UserThreshold {
    /// Builds a threshold from the raw CLI value: negative numbers select
    /// percent mode (magnitude interpreted as a percentage), non-negative
    /// numbers are an absolute dB/unit cutoff.
    pub fn from_raw(raw: f64) -> Self {
        if raw < 0.0 {
            UserThreshold::Percent(raw.abs() / 100.0)
        } else {
            UserThreshold::Absolute(raw)
        }
    }

    pub fn is_sensitive(self) -> bool {
        matches!(self, UserThreshold::Absolute(t) if t == 0.0)
    }
}

impl Default for UserThreshold {
    fn default() -> Self {
        UserThreshold::Absolute(0.05)
    }
}

/// The three user-facing thresholds a comparison run is configured with.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub user: UserThreshold,
    pub critical: f64,
    pub print: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            user: UserThreshold::default(),
            critical: 10.0,
            print: 1.0,
        }
    }
}

/// Six-level classification outcome for a single element pair
/// (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Zero,
    Trivial,
    Insignificant,
    Marginal,
    Critical,
    Error,
    NonError,
}

/// A single point in the error-pattern dataset: the range-column value
/// paired with the signed raw error at that element (spec.md §3).
#[derive(Debug, Clone, Copy)]
pub struct ErrorSample {
    pub range: f64,
    pub error: f64,
}

/// Running counters, one bucket per classification plus the aggregate
/// umbrella counters (spec.md §3). `elem_total` is the sum of the seven
/// mutually exclusive leaf buckets.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    pub elem_total: u64,
    pub diff_non_zero: u64,
    pub diff_trivial: u64,
    pub diff_non_trivial: u64,
    pub diff_insignificant: u64,
    pub diff_high_ignore: u64,
    pub diff_significant: u64,
    pub diff_marginal: u64,
    pub diff_critical: u64,
    pub diff_error: u64,
    pub diff_non_error: u64,
    pub diff_printed: u64,
}

impl Counters {
    /// Folds one classified element into the running counters,
    /// maintaining the per-level summation invariants of spec.md §4.4
    /// and §8 (`elem_total`, `non_zero = trivial + non_trivial`,
    /// `non_trivial = insignificant + significant`, `significant =
    /// marginal + critical + error + non_error`).
    pub fn record(&mut self, classification: Classification, is_high_ignore: bool) {
        self.elem_total += 1;
        match classification {
            Classification::Zero => {}
            Classification::Trivial => {
                self.diff_non_zero += 1;
                self.diff_trivial += 1;
            }
            Classification::Insignificant => {
                self.diff_non_zero += 1;
                self.diff_non_trivial += 1;
                self.diff_insignificant += 1;
                if is_high_ignore {
                    self.diff_high_ignore += 1;
                }
            }
            Classification::Marginal => {
                self.diff_non_zero += 1;
                self.diff_non_trivial += 1;
                self.diff_significant += 1;
                self.diff_marginal += 1;
            }
            Classification::Critical => {
                self.diff_non_zero += 1;
                self.diff_non_trivial += 1;
                self.diff_significant += 1;
                self.diff_critical += 1;
            }
            Classification::Error => {
                self.diff_non_zero += 1;
                self.diff_non_trivial += 1;
                self.diff_significant += 1;
                self.diff_error += 1;
            }
            Classification::NonError => {
                self.diff_non_zero += 1;
                self.diff_non_trivial += 1;
                self.diff_significant += 1;
                self.diff_non_error += 1;
            }
        }
    }

    pub fn has_non_zero(&self) -> bool {
        self.diff_non_zero > 0
    }
    pub fn has_non_trivial(&self) -> bool {
        self.diff_non_trivial > 0
    }
    pub fn has_significant(&self) -> bool {
        self.diff_significant > 0
    }
    pub fn has_marginal(&self) -> bool {
        self.diff_marginal > 0
    }
    pub fn has_critical(&self) -> bool {
        self.diff_critical > 0
    }
    pub fn has_error(&self) -> bool {
        self.diff_error > 0
    }
}

/// A tracked maximum difference together with the format-tracker context
/// (minimum decimal places) it was observed under.
#[derive(Debug, Clone, Copy)]
pub struct MaxValue {
    pub value: f64,
    pub min_dp: i32,
}

/// The three maximum-difference trackers plus the running maximum percent
/// error, which can go infinite when the reference value is at zero.
#[derive(Debug, Clone, Default)]
pub struct Maxima {
    pub max_non_zero: Option<MaxValue>,
    pub max_non_trivial: Option<MaxValue>,
    pub max_significant: Option<MaxValue>,
    pub max_percent_error: Option<f64>,
    pub percent_error_is_infinite: bool,
}

impl Maxima {
    fn bump(slot: &mut Option<MaxValue>, candidate: MaxValue) {
        match slot {
            Some(existing) if existing.value >= candidate.value => {}
            _ => *slot = Some(candidate),
        }
    }

    pub fn observe_non_zero(&mut self, value: f64, min_dp: i32) {
        Self::bump(&mut self.max_non_zero, MaxValue { value, min_dp });
    }

    pub fn observe_non_trivial(&mut self, value: f64, min_dp: i32) {
        Self::bump(&mut self.max_non_trivial, MaxValue { value, min_dp });
    }

    pub fn observe_significant(&mut self, value: f64, min_dp: i32) {
        Self::bump(&mut self.max_significant, MaxValue { value, min_dp });
    }

    pub fn observe_percent(&mut self, pct: Option<f64>) {
        match pct {
            None => self.percent_error_is_infinite = true,
            Some(p) if !self.percent_error_is_infinite => {
                if self.max_percent_error.map_or(true, |m| p > m) {
                    self.max_percent_error = Some(p);
                }
            }
            Some(_) => {}
        }
    }
}

/// A unit-mismatch diagnosis: the line it was first detected on and the
/// observed ratio between the two files' range-column values there.
#[derive(Debug, Clone, Copy)]
pub struct UnitMismatch {
    pub line: usize,
    pub ratio: f64,
}

/// Boolean/derived state tracked across the whole comparison.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub files_are_same: bool,
    pub files_have_same_values: bool,
    pub has_critical_diff: bool,
    pub structure_mismatch: bool,
    pub length_mismatch: bool,
    pub parse_failed: bool,
    pub short_line: bool,
    pub unit_mismatch: Option<UnitMismatch>,
    pub column1_is_range_data: bool,
}

/// The configurable constants the error-pattern analyzer's classification
/// rules are tuned by (spec.md §9 "configurable pattern constants").
#[derive(Debug, Clone, Copy)]
pub struct PatternConstants {
    pub slope_threshold: f64,
    pub r_squared_threshold: f64,
    pub autocorr_threshold: f64,
    pub z_threshold: f64,
    pub spike_threshold: f64,
    pub rmse_null_threshold: f64,
    pub bias_fraction: f64,
}

impl Default for PatternConstants {
    fn default() -> Self {
        PatternConstants {
            slope_threshold: 1e-6,
            r_squared_threshold: 0.5,
            autocorr_threshold: 0.5,
            z_threshold: 1.96,
            spike_threshold: 3.0,
            rmse_null_threshold: 1e-5,
            bias_fraction: 0.1,
        }
    }
}

/// The final output of a comparison run: everything the summary emitter
/// and the CLI's exit code decide on.
#[derive(Debug, Clone)]
pub struct VerdictReport {
    pub counters: Counters,
    pub maxima: Maxima,
    pub flags: Flags,
    pub pattern: Option<PatternAnalysis>,
    pub pass: bool,
    pub reasons: Vec<String>,
}

impl VerdictReport {
    pub fn exit_code(&self) -> i32 {
        if self.pass {
            0
        } else {
            1
        }
    }
}
