//! Descriptive statistics shared by the summary tables
//!
//! Means are plain left-to-right sums divided by the count, so a mean computed
//! here and one accumulated inside a kernel over the same values in the same
//! order are bit-identical.

use serde::{Deserialize, Serialize};

use crate::error::{PsaError, Result};

/// Default confidence level for summary intervals (2.5% / 97.5% tails)
pub const DEFAULT_INTERVAL_LEVEL: f64 = 0.95;

/// Mean with a lower and upper empirical quantile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Quantile probabilities bounding a central interval of the given confidence level.
///
/// `ci_tails(0.95)` is `(0.025, 0.975)`.
pub fn ci_tails(level: f64) -> Result<(f64, f64)> {
    if !(level > 0.0 && level < 1.0) {
        return Err(PsaError::InvalidConfidenceLevel(level));
    }
    let alpha = 1.0 - level;
    Ok((alpha / 2.0, 1.0 - alpha / 2.0))
}

/// Arithmetic mean; NaN for an empty slice or when any value is NaN
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sum = 0.0;
    for &v in values {
        sum += v;
    }
    sum / values.len() as f64
}

/// Linear-interpolation quantile (Hyndman & Fan type 7) of an ascending slice.
///
/// With `h = (n - 1) * p`, returns `(1 - f) * x[floor(h)] + f * x[floor(h) + 1]`
/// where `f` is the fractional part of `h`. Equal neighbours are returned
/// unchanged, so a zero-variance sample yields its common value exactly.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let h = (n - 1) as f64 * p;
    let lo = (h.floor() as usize).min(n - 1);
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    let (a, b) = (sorted[lo], sorted[hi]);
    if frac == 0.0 || a == b {
        a
    } else {
        (1.0 - frac) * a + frac * b
    }
}

/// Mean and tail quantiles of `values`, which is sorted in place.
///
/// The mean is taken before sorting so it follows sample order. Any NaN makes
/// the whole interval NaN.
pub fn summarize(values: &mut [f64], tails: (f64, f64)) -> Interval {
    let mean = mean(values);
    if values.iter().any(|v| v.is_nan()) {
        return Interval {
            mean: f64::NAN,
            lower: f64::NAN,
            upper: f64::NAN,
        };
    }
    values.sort_unstable_by(f64::total_cmp);
    Interval {
        mean,
        lower: quantile_sorted(values, tails.0),
        upper: quantile_sorted(values, tails.1),
    }
}
