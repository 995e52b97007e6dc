//! Run configuration loaded from YAML.
//!
//! ```yaml
//! columns:
//!   sample: draw
//!   strategy: arm
//!   group: age_band
//! comparator: 1
//! k: 50000
//! conf_level: 0.9
//! analysis:
//!   wtp: { min: 0, max: 100000, step: 1000 }
//!   interval_level: 0.95
//! ```

use std::path::Path;

use color_eyre::eyre::WrapErr;
use psakit_core::{AnalysisConfig, ColumnRoles};
use serde::{Deserialize, Serialize};

/// Everything a run can take from a configuration file. Command-line flags
/// override the matching fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Column names bound to each role of the draw table
    pub columns: ColumnRoles,
    /// Comparator strategy id for the pairwise and ICER commands
    pub comparator: Option<u32>,
    /// Decision threshold for the ICER command
    pub k: Option<f64>,
    /// Confidence level of the ICER table intervals
    pub conf_level: Option<f64>,
    pub analysis: AnalysisConfig,
}

impl RunConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded run config");
        Ok(config)
    }
}
