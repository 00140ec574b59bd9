//! Token scanner & line parser (spec.md §4.1).
//!
//! Splits a line on whitespace, stitches `(re, im)` complex literals
//! back together across the whitespace split, and derives a printed
//! decimal-place count for every real value — the precision that later
//! feeds the sub-LSB triviality test in `difference.rs`.

use crate::error::{CompareError, Result};

/// One parsed data line: the scalar values in column order and, for
/// each, how many decimal places its source text printed. A complex
/// token `(re, im)` expands into two consecutive elements.
#[derive(Debug, Clone, Default)]
pub struct LineRecord {
    pub values: Vec<f64>,
    pub decimals: Vec<i32>,
}

impl LineRecord {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parses one line. Returns `Ok(None)` for a blank (whitespace-only)
/// line, which callers skip silently per spec.md §4.1.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<LineRecord>> {
    let raw_tokens: Vec<&str> = line.split_whitespace().collect();
    if raw_tokens.is_empty() {
        return Ok(None);
    }

    let mut record = LineRecord::default();
    let mut i = 0;
    while i < raw_tokens.len() {
        let tok = raw_tokens[i];
        if tok.starts_with('(') {
            let mut joined = String::new();
            let mut j = i;
            loop {
                if j >= raw_tokens.len() {
                    return Err(CompareError::MalformedComplex {
                        line: line_no,
                        token: joined,
                    });
                }
                if !joined.is_empty() {
                    joined.push(' ');
                }
                joined.push_str(raw_tokens[j]);
                if raw_tokens[j].ends_with(')') {
                    break;
                }
                j += 1;
            }
            let (re, im) = parse_complex(&joined, line_no)?;
            let (re_val, re_dp) = re;
            let (im_val, im_dp) = im;
            record.values.push(re_val);
            record.decimals.push(re_dp);
            record.values.push(im_val);
            record.decimals.push(im_dp);
            i = j + 1;
        } else {
            let (val, dp) = parse_real(tok, line_no)?;
            record.values.push(val);
            record.decimals.push(dp);
            i += 1;
        }
    }
    Ok(Some(record))
}

/// Parses `(re, im)` (whitespace around the comma is tolerated since
/// the caller has already rejoined split whitespace tokens with single
/// spaces) into two `(value, decimal_count)` pairs.
fn parse_complex(joined: &str, line_no: usize) -> Result<((f64, i32), (f64, i32))> {
    let inner = joined
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| CompareError::MalformedComplex {
            line: line_no,
            token: joined.to_string(),
        })?;
    let parts: Vec<&str> = inner.splitn(2, ',').collect();
    if parts.len() != 2 {
        return Err(CompareError::MalformedComplex {
            line: line_no,
            token: joined.to_string(),
        });
    }
    let re = parse_real(parts[0].trim(), line_no)?;
    let im = parse_real(parts[1].trim(), line_no)?;
    Ok((re, im))
}

/// Parses one real-number token and derives its printed decimal count.
fn parse_real(tok: &str, line_no: usize) -> Result<(f64, i32)> {
    let value: f64 = tok.parse().map_err(|_| CompareError::NotNumeric {
        line: line_no,
        token: tok.to_string(),
    })?;
    let dp = decimal_places(tok, line_no)?;
    Ok((value, dp))
}

/// Derives the decimal-place count a token was printed with.
///
/// Plain decimal: digits after the `.` (none ⇒ 0). Scientific
/// notation: the effective decimal count is `sig_figs - 1 - exponent`,
/// clamped to `[0, 10]` per spec.md §4.1, where `sig_figs` is the
/// number of digit characters in the mantissa.
fn decimal_places(tok: &str, line_no: usize) -> Result<i32> {
    let (mantissa, exponent) = split_exponent(tok);

    if let Some(exp) = exponent {
        let sig_figs = mantissa.chars().filter(|c| c.is_ascii_digit()).count() as i32;
        let effective = sig_figs - 1 - exp;
        return Ok(effective.clamp(0, 10));
    }

    let dp = match mantissa.find('.') {
        Some(dot) => (mantissa.len() - dot - 1) as i32,
        None => 0,
    };
    if !(0..=17).contains(&dp) {
        return Err(CompareError::InvalidDecimalCount {
            line: line_no,
            count: dp,
        });
    }
    Ok(dp)
}

/// Splits `mantissa[eE]exponent` into its parts; returns `exponent =
/// None` when the token has no exponent marker.
fn split_exponent(tok: &str) -> (&str, Option<i32>) {
    if let Some(pos) = tok.find(['e', 'E']) {
        let (mantissa, rest) = tok.split_at(pos);
        let exp_str = &rest[1..];
        if let Ok(exp) = exp_str.parse::<i32>() {
            return (mantissa, Some(exp));
        }
    }
    (tok, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_reals() {
        let rec = parse_line("1.0 2.0", 1).unwrap().unwrap();
        assert_eq!(rec.values, vec![1.0, 2.0]);
        assert_eq!(rec.decimals, vec![1, 1]);
    }

    #[test]
    fn parses_integer_as_zero_decimals() {
        let rec = parse_line("42", 1).unwrap().unwrap();
        assert_eq!(rec.decimals, vec![0]);
    }

    #[test]
    fn parses_complex_literal_as_two_elements() {
        let rec = parse_line("(1.5, -2.25) 3.0", 1).unwrap().unwrap();
        assert_eq!(rec.values, vec![1.5, -2.25, 3.0]);
        assert_eq!(rec.decimals, vec![1, 2, 1]);
    }

    #[test]
    fn parses_complex_literal_split_across_whitespace() {
        let rec = parse_line("(1.5,  -2.25)", 1).unwrap().unwrap();
        assert_eq!(rec.values, vec![1.5, -2.25]);
    }

    #[test]
    fn blank_line_is_skipped() {
        assert!(parse_line("   ", 1).unwrap().is_none());
    }

    #[test]
    fn exponent_adjusts_effective_decimals() {
        // mantissa "1.2345" -> 5 significant digits, exponent 3
        // effective = 5 - 1 - 3 = 1
        let rec = parse_line("1.2345e3", 1).unwrap().unwrap();
        assert_eq!(rec.decimals, vec![1]);
    }

    #[test]
    fn decimal_count_above_17_rejected() {
        let tok = format!("1.{}", "1".repeat(18));
        let err = parse_line(&tok, 7).unwrap_err();
        match err {
            CompareError::InvalidDecimalCount { line, count } => {
                assert_eq!(line, 7);
                assert_eq!(count, 18);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decimal_count_at_17_boundary_parses() {
        let tok = format!("1.{}", "1".repeat(17));
        let rec = parse_line(&tok, 1).unwrap().unwrap();
        assert_eq!(rec.decimals, vec![17]);
    }

    #[test]
    fn malformed_complex_missing_close_paren() {
        let err = parse_line("(1.0, 2.0", 1).unwrap_err();
        assert!(matches!(err, CompareError::MalformedComplex { .. }));
    }
}
