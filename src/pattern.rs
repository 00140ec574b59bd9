//! Error-pattern analyzer (spec.md §4.6).
//!
//! Runs once, after the comparator has finished collecting the
//! `(range, error)` dataset, and classifies the shape of the residual
//! sequence. Its verdict feeds the `TRANSIENT_SPIKES` override in
//! `verdict.rs`. No crate in the teacher's stack does statistics, so
//! this is hand-rolled the same way the teacher hand-rolls string
//! similarity (Levenshtein/TF-IDF) rather than reaching for a crate.

use crate::types::PatternConstants;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPattern {
    SystematicGrowth,
    SystematicBias,
    RandomNoise,
    TransientSpikes,
    NullPointNoise,
}

#[derive(Debug, Clone, Copy)]
pub struct PatternAnalysis {
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub autocorrelation: f64,
    pub is_correlated: bool,
    pub runs: usize,
    pub expected_runs: f64,
    pub z_score: f64,
    pub is_random: bool,
    pub spike_ratio: f64,
    pub rmse: f64,
    pub pattern: ErrorPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientData;

/// One `(range, error)` observation from a data-column element whose
/// values both sit at or below `IGNORE` (spec.md §3).
#[derive(Debug, Clone, Copy)]
pub struct ErrorSample {
    pub range: f64,
    pub error: f64,
}

pub fn analyze(
    samples: &[ErrorSample],
    constants: &PatternConstants,
) -> Result<PatternAnalysis, InsufficientData> {
    let n = samples.len();
    if n < 5 {
        return Err(InsufficientData);
    }

    let regression = linear_regression(samples);
    let autocorrelation = lag1_autocorrelation(samples);
    let is_correlated = autocorrelation.abs() > constants.autocorr_threshold;

    let run_stats = run_test(samples);
    let is_random = run_stats.z_score.abs() < constants.z_threshold;

    let errors: Vec<f64> = samples.iter().map(|s| s.error).collect();
    let mean_error = errors.iter().sum::<f64>() / n as f64;
    let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / n as f64).sqrt();
    let max_abs = errors.iter().fold(0.0_f64, |acc, e| acc.max(e.abs()));
    let spike_ratio = if rmse > 0.0 { max_abs / rmse } else { f64::INFINITY };

    let slope_significant =
        regression.slope.abs() > constants.slope_threshold && regression.p_value < 0.05;

    let pattern = if slope_significant
        && regression.r_squared > constants.r_squared_threshold
        && regression.slope > 0.0
    {
        ErrorPattern::SystematicGrowth
    } else if regression.r_squared > constants.r_squared_threshold
        && !slope_significant
        && mean_error.abs() > constants.bias_fraction * rmse
    {
        ErrorPattern::SystematicBias
    } else if is_random && !is_correlated {
        ErrorPattern::RandomNoise
    } else if max_abs > constants.spike_threshold * rmse && is_random {
        ErrorPattern::TransientSpikes
    } else if rmse < constants.rmse_null_threshold {
        ErrorPattern::NullPointNoise
    } else {
        ErrorPattern::RandomNoise
    };

    Ok(PatternAnalysis {
        n,
        slope: regression.slope,
        intercept: regression.intercept,
        r_squared: regression.r_squared,
        p_value: regression.p_value,
        autocorrelation,
        is_correlated,
        runs: run_stats.runs,
        expected_runs: run_stats.expected_runs,
        z_score: run_stats.z_score,
        is_random,
        spike_ratio,
        rmse,
        pattern,
    })
}

struct Regression {
    slope: f64,
    intercept: f64,
    r_squared: f64,
    p_value: f64,
}

fn linear_regression(samples: &[ErrorSample]) -> Regression {
    let n = samples.len() as f64;
    let mean_x = samples.iter().map(|s| s.range).sum::<f64>() / n;
    let mean_y = samples.iter().map(|s| s.error).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for s in samples {
        let dx = s.range - mean_x;
        sxx += dx * dx;
        sxy += dx * (s.error - mean_y);
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = mean_y - slope * mean_x;

    let mut sse = 0.0;
    let mut sst = 0.0;
    for s in samples {
        let predicted = slope * s.range + intercept;
        let residual = s.error - predicted;
        sse += residual * residual;
        let dy = s.error - mean_y;
        sst += dy * dy;
    }
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 0.0 };

    let p_value = if samples.len() > 2 && sxx > 0.0 {
        let mse = sse / (n - 2.0);
        let se_slope = (mse / sxx).sqrt();
        if se_slope > 0.0 {
            let t = slope / se_slope;
            erfc((t.abs()) / std::f64::consts::SQRT_2)
        } else {
            0.0
        }
    } else {
        1.0
    };

    Regression {
        slope,
        intercept,
        r_squared,
        p_value,
    }
}

fn lag1_autocorrelation(samples: &[ErrorSample]) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }
    let errors: Vec<f64> = samples.iter().map(|s| s.error).collect();
    let mean = errors.iter().sum::<f64>() / n as f64;

    let var: f64 = errors.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n as f64;
    if var <= 0.0 {
        return 0.0;
    }

    let cov: f64 = errors
        .windows(2)
        .map(|w| (w[0] - mean) * (w[1] - mean))
        .sum::<f64>()
        / (n - 1) as f64;

    cov / var
}

struct RunStats {
    runs: usize,
    expected_runs: f64,
    z_score: f64,
}

/// Wald-Wolfowitz run test over the sign sequence of the errors; a
/// zero error extends whatever run is currently open rather than
/// starting or breaking one (spec.md §4.6).
fn run_test(samples: &[ErrorSample]) -> RunStats {
    let mut n_pos = 0usize;
    let mut n_neg = 0usize;
    let mut runs = 0usize;
    let mut current_sign: Option<i32> = None;

    for s in samples {
        let sign = if s.error > 0.0 {
            1
        } else if s.error < 0.0 {
            -1
        } else {
            0
        };
        if sign == 1 {
            n_pos += 1;
        } else if sign == -1 {
            n_neg += 1;
        }
        if sign != 0 && current_sign != Some(sign) {
            runs += 1;
            current_sign = Some(sign);
        }
    }

    let n_total = n_pos + n_neg;
    if n_total < 2 {
        return RunStats {
            runs,
            expected_runs: runs as f64,
            z_score: 0.0,
        };
    }

    let (np, nn, nt) = (n_pos as f64, n_neg as f64, n_total as f64);
    let expected_runs = 2.0 * np * nn / nt + 1.0;
    let variance = 2.0 * np * nn * (2.0 * np * nn - nt) / (nt * nt * (nt - 1.0));
    let z_score = if variance > 0.0 {
        (runs as f64 - expected_runs) / variance.sqrt()
    } else {
        0.0
    };

    RunStats {
        runs,
        expected_runs,
        z_score,
    }
}

/// Abramowitz & Stegun 7.1.26 rational approximation of `erf`, good to
/// ~1.5e-7 — no `statrs`/`libm` dependency is in the teacher's stack,
/// so this stays hand-rolled like the rest of this module.
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}

fn erfc(x: f64) -> f64 {
    1.0 - erf(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> PatternConstants {
        PatternConstants::default()
    }

    #[test]
    fn fewer_than_five_samples_is_insufficient() {
        let samples = vec![ErrorSample { range: 1.0, error: 0.1 }; 4];
        assert_eq!(analyze(&samples, &constants()), Err(InsufficientData));
    }

    #[test]
    fn growing_linear_errors_are_systematic_growth() {
        let samples: Vec<ErrorSample> = (0..20)
            .map(|i| ErrorSample {
                range: i as f64,
                error: 0.01 * i as f64,
            })
            .collect();
        let analysis = analyze(&samples, &constants()).unwrap();
        assert_eq!(analysis.pattern, ErrorPattern::SystematicGrowth);
    }

    #[test]
    fn alternating_signs_are_random_noise() {
        let samples: Vec<ErrorSample> = (0..20)
            .map(|i| ErrorSample {
                range: i as f64,
                error: if i % 2 == 0 { 0.01 } else { -0.01 },
            })
            .collect();
        let analysis = analyze(&samples, &constants()).unwrap();
        assert!(matches!(
            analysis.pattern,
            ErrorPattern::RandomNoise | ErrorPattern::TransientSpikes
        ));
    }

    #[test]
    fn near_zero_errors_are_null_point_noise() {
        let samples: Vec<ErrorSample> = (0..20)
            .map(|i| ErrorSample {
                range: i as f64,
                error: if i % 2 == 0 { 1e-8 } else { -1e-8 },
            })
            .collect();
        let analysis = analyze(&samples, &constants()).unwrap();
        assert_eq!(analysis.pattern, ErrorPattern::NullPointNoise);
    }

    #[test]
    fn single_spike_among_noise_is_transient() {
        let mut samples: Vec<ErrorSample> = (0..19)
            .map(|i| ErrorSample {
                range: i as f64,
                error: if i % 2 == 0 { 0.001 } else { -0.001 },
            })
            .collect();
        samples.push(ErrorSample {
            range: 19.0,
            error: 0.02,
        });
        let analysis = analyze(&samples, &constants()).unwrap();
        assert!(analysis.spike_ratio > 3.0);
    }
}
