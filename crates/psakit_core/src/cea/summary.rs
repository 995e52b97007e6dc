//! Mean and interval of effect and cost per strategy and group.

use serde::{Deserialize, Serialize};

use crate::model::{GroupId, StrategyId};
use crate::panel::Panel;
use crate::stats::{Interval, summarize};

/// Effect and cost summary of one strategy in one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub strategy: StrategyId,
    pub group: GroupId,
    pub effect: Interval,
    pub cost: Interval,
}

/// Summaries ordered by strategy, then group.
///
/// On a delta panel the intervals describe incremental effect and cost.
pub fn outcome_summary(panel: &Panel, tails: (f64, f64)) -> Vec<SummaryRow> {
    let n_samples = panel.n_samples();
    let mut effects = vec![0.0; n_samples];
    let mut costs = vec![0.0; n_samples];
    let mut rows = Vec::with_capacity(panel.strategies().len() * panel.groups().len());

    for (j, &strategy) in panel.strategies().iter().enumerate() {
        for (g, &group) in panel.groups().iter().enumerate() {
            for s in 0..n_samples {
                (effects[s], costs[s]) = panel.get(g, s, j);
            }
            rows.push(SummaryRow {
                strategy,
                group,
                effect: summarize(&mut effects, tails),
                cost: summarize(&mut costs, tails),
            });
        }
    }
    rows
}
