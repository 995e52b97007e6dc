//! Pairwise analysis against a designated comparator.
//!
//! ```ignore
//! use psakit_core::{AnalysisConfig, StrategyId, cea_pw, icer};
//!
//! let pw = cea_pw(&table, StrategyId(1), &AnalysisConfig::default())?;
//! let icers = icer(&pw, 50_000.0, 0.95)?;
//! ```

mod ceac;
mod delta;
mod summary;

pub use ceac::{CeacRow, ceac_kernel};
pub use delta::{DeltaRow, DeltaTable, incremental};
pub use summary::{PairwiseSummaryRow, icer_ratio};

use serde::Serialize;

use crate::cea::{NmbRow, nmb_summary};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::model::{DrawTable, StrategyId};

/// Comparator and key names carried to downstream consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairwiseMeta {
    pub comparator: StrategyId,
    /// Ordinal position of the comparator among all strategies, used to keep
    /// strategy order consistent across outputs
    pub comparator_index: usize,
    pub strategy_key: String,
    pub group_key: String,
}

/// Output tables of the pairwise analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseResult {
    /// Incremental effect and cost per (strategy, group), with the ICER
    pub summary: Vec<PairwiseSummaryRow>,
    /// Incremental draws per (group, strategy, sample)
    pub delta: DeltaTable,
    /// Probability of positive incremental NMB per (k, group, strategy)
    pub ceac: Vec<CeacRow>,
    /// Incremental NMB per (strategy, group, k)
    pub inmb: Vec<NmbRow>,
    pub meta: PairwiseMeta,
}

/// Run the pairwise analysis of every strategy against `comparator`.
///
/// Validates the threshold grid and interval level, then the comparator and
/// panel balance, before any kernel runs.
pub fn cea_pw(
    table: &DrawTable,
    comparator: StrategyId,
    config: &AnalysisConfig,
) -> Result<PairwiseResult> {
    let wtp = config.wtp_grid()?;
    let tails = config.tails()?;
    let delta = incremental(table, comparator)?;

    tracing::info!(
        comparator = comparator.0,
        treatments = delta.strategies().len(),
        samples = delta.panel().n_samples(),
        thresholds = wtp.len(),
        "running pairwise analysis"
    );

    let summary = summary::pairwise_summary(&delta, tails);
    let ceac = ceac::ceac_table(&delta, &wtp);
    let inmb = nmb_summary(delta.panel(), &wtp, tails);
    tracing::debug!(ceac_rows = ceac.len(), inmb_rows = inmb.len(), "pairwise tables done");

    Ok(PairwiseResult {
        summary,
        meta: PairwiseMeta {
            comparator,
            comparator_index: delta.comparator_index(),
            strategy_key: table.keys().strategy.clone(),
            group_key: table.keys().group.clone(),
        },
        delta,
        ceac,
        inmb,
    })
}
