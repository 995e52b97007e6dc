//! Incremental effect and cost summaries with the ICER.

use serde::{Deserialize, Serialize};

use super::delta::DeltaTable;
use crate::cea::outcome_summary;
use crate::model::{GroupId, StrategyId};
use crate::stats::Interval;

/// Incremental outcomes of one treatment strategy in one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairwiseSummaryRow {
    pub strategy: StrategyId,
    pub group: GroupId,
    pub incremental_effect: Interval,
    pub incremental_cost: Interval,
    /// `incremental_cost.mean / incremental_effect.mean`
    pub icer: f64,
}

/// Ratio of mean incremental cost to mean incremental effect.
///
/// Not the mean of per-draw ratios. A zero mean incremental effect gives an
/// infinite or NaN ratio, which the dominance label supersedes in the ICER
/// table.
pub fn icer_ratio(mean_incremental_cost: f64, mean_incremental_effect: f64) -> f64 {
    mean_incremental_cost / mean_incremental_effect
}

/// Summaries ordered by treatment strategy, then group
pub(crate) fn pairwise_summary(delta: &DeltaTable, tails: (f64, f64)) -> Vec<PairwiseSummaryRow> {
    outcome_summary(delta.panel(), tails)
        .into_iter()
        .map(|row| PairwiseSummaryRow {
            strategy: row.strategy,
            group: row.group,
            incremental_effect: row.effect,
            incremental_cost: row.cost,
            icer: icer_ratio(row.cost.mean, row.effect.mean),
        })
        .collect()
}
