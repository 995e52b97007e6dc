//! Analysis configuration
//!
//! `AnalysisConfig` is the serializable form read from configuration files.
//! It is validated into a [`WtpGrid`] and a pair of quantile tails before any
//! kernel runs, so invalid thresholds or confidence levels fail fast.
//!
//! ```ignore
//! use psakit_core::config::{AnalysisConfig, WtpSpec};
//!
//! let config = AnalysisConfig {
//!     wtp: WtpSpec::Range { min: 0.0, max: 100_000.0, step: 1_000.0 },
//!     ..Default::default()
//! };
//! let grid = config.wtp_grid()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{PsaError, Result};
use crate::stats::{DEFAULT_INTERVAL_LEVEL, ci_tails};

/// Default grid: 0 to 200,000 in steps of 500
pub const DEFAULT_WTP_MIN: f64 = 0.0;
pub const DEFAULT_WTP_MAX: f64 = 200_000.0;
pub const DEFAULT_WTP_STEP: f64 = 500.0;

/// Largest number of thresholds a range may expand to
pub const MAX_WTP_GRID_LEN: usize = 1_000_000;

/// Ordered, validated willingness-to-pay thresholds.
///
/// Every threshold is finite and non-negative. Order is preserved as given.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WtpGrid(Vec<f64>);

impl WtpGrid {
    pub fn new(thresholds: Vec<f64>) -> Result<Self> {
        if thresholds.is_empty() {
            return Err(PsaError::EmptyWtpGrid);
        }
        if let Some((index, &value)) = thresholds
            .iter()
            .enumerate()
            .find(|(_, k)| !(k.is_finite() && **k >= 0.0))
        {
            return Err(PsaError::InvalidThreshold { index, value });
        }
        Ok(Self(thresholds))
    }

    /// Inclusive arithmetic grid `min, min + step, ...` up to `max`.
    ///
    /// Thresholds are computed as `min + i * step` rather than by repeated
    /// addition so long grids do not drift.
    pub fn range(min: f64, max: f64, step: f64) -> Result<Self> {
        let invalid = || PsaError::InvalidWtpRange { min, max, step };
        if !(min.is_finite() && max.is_finite() && step.is_finite()) || step <= 0.0 || max < min {
            return Err(invalid());
        }
        // Small slack so a max that is an exact multiple of step is included
        let steps = ((max - min) / step + 1e-9).floor();
        if !steps.is_finite() || steps >= MAX_WTP_GRID_LEN as f64 {
            return Err(invalid());
        }
        let count = steps as usize + 1;
        let thresholds = (0..count).map(|i| min + i as f64 * step).collect();
        Self::new(thresholds)
    }

    /// Single-threshold grid, used for decision-point summaries
    pub fn single(k: f64) -> Result<Self> {
        Self::new(vec![k])
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WtpGrid {
    fn default() -> Self {
        let count = ((DEFAULT_WTP_MAX - DEFAULT_WTP_MIN) / DEFAULT_WTP_STEP) as usize + 1;
        Self(
            (0..count)
                .map(|i| DEFAULT_WTP_MIN + i as f64 * DEFAULT_WTP_STEP)
                .collect(),
        )
    }
}

/// How the willingness-to-pay grid is written in a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WtpSpec {
    /// Explicit list of thresholds
    Values(Vec<f64>),
    /// Inclusive arithmetic range
    Range { min: f64, max: f64, step: f64 },
}

impl Default for WtpSpec {
    fn default() -> Self {
        WtpSpec::Range {
            min: DEFAULT_WTP_MIN,
            max: DEFAULT_WTP_MAX,
            step: DEFAULT_WTP_STEP,
        }
    }
}

/// Settings shared by the whole-population and pairwise analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Willingness-to-pay thresholds
    pub wtp: WtpSpec,
    /// Confidence level of the summary intervals, in (0, 1)
    pub interval_level: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            wtp: WtpSpec::default(),
            interval_level: DEFAULT_INTERVAL_LEVEL,
        }
    }
}

impl AnalysisConfig {
    pub fn wtp_grid(&self) -> Result<WtpGrid> {
        match &self.wtp {
            WtpSpec::Values(values) => WtpGrid::new(values.clone()),
            WtpSpec::Range { min, max, step } => WtpGrid::range(*min, *max, *step),
        }
    }

    /// Quantile probabilities of the summary intervals
    pub fn tails(&self) -> Result<(f64, f64)> {
        ci_tails(self.interval_level)
    }
}
