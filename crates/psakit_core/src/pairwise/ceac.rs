//! Cost-effectiveness acceptability curves against a comparator.

use serde::{Deserialize, Serialize};

use super::delta::DeltaTable;
use crate::cells::for_each_cell;
use crate::config::WtpGrid;
use crate::grid::Layout;
use crate::model::{GroupId, StrategyId};

/// Probability that `strategy` has positive incremental NMB in `group` at `k`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CeacRow {
    pub k: f64,
    pub strategy: StrategyId,
    pub group: GroupId,
    pub prob: f64,
}

/// CEAC probabilities as a flat array ordered `[k][group][strategy]`.
///
/// A draw counts when `k * incremental_effect - incremental_cost > 0`; an
/// incremental NMB of exactly zero is not cost-effective. Any NaN in a
/// (k, group, strategy) series makes that probability NaN.
pub fn ceac_kernel(
    wtp: &[f64],
    incremental_effect: &[f64],
    incremental_cost: &[f64],
    layout: &Layout,
) -> Vec<f64> {
    let n_groups = layout.n_groups();
    let n_samples = layout.n_samples();
    let n_strategies = layout.n_strategies();
    let mut probs = vec![0.0; wtp.len() * n_groups * n_strategies];

    for_each_cell(&mut probs, n_strategies, |cell, out| {
        let k = wtp[cell / n_groups];
        let g = cell % n_groups;

        for (j, prob) in out.iter_mut().enumerate() {
            let mut wins = 0usize;
            let mut saw_nan = false;
            for s in 0..n_samples {
                let at = layout.offset(g, s, j);
                let inmb = k * incremental_effect[at] - incremental_cost[at];
                saw_nan |= inmb.is_nan();
                if inmb > 0.0 {
                    wins += 1;
                }
            }
            *prob = if saw_nan {
                f64::NAN
            } else {
                wins as f64 / n_samples as f64
            };
        }
    });

    probs
}

/// CEAC rows for every (k, group, treatment strategy)
pub(crate) fn ceac_table(delta: &DeltaTable, wtp: &WtpGrid) -> Vec<CeacRow> {
    let panel = delta.panel();
    let probs = ceac_kernel(
        wtp.thresholds(),
        panel.effect(),
        panel.cost(),
        panel.layout(),
    );

    let strategies = panel.strategies();
    let groups = panel.groups();
    let mut rows = Vec::with_capacity(probs.len());
    for (ki, &k) in wtp.thresholds().iter().enumerate() {
        for (g, &group) in groups.iter().enumerate() {
            let cell = (ki * groups.len() + g) * strategies.len();
            for (j, &strategy) in strategies.iter().enumerate() {
                rows.push(CeacRow {
                    k,
                    strategy,
                    group,
                    prob: probs[cell + j],
                });
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DrawOrder;

    #[test]
    fn test_zero_inmb_is_not_cost_effective() {
        // One group, one strategy, four samples with ie = 1, ic = 10
        let layout = Layout::new(DrawOrder::GroupStrategySample, 1, 4, 1);
        let ie = [1.0; 4];
        let ic = [10.0; 4];

        let probs = ceac_kernel(&[5.0, 10.0, 15.0], &ie, &ic, &layout);
        assert_eq!(probs, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_fraction_of_positive_draws() {
        let layout = Layout::new(DrawOrder::GroupStrategySample, 1, 4, 2);
        // Strategy a: ie = 1, 2, 3, 4; strategy b: ie = -1 everywhere
        let ie = [1.0, 2.0, 3.0, 4.0, -1.0, -1.0, -1.0, -1.0];
        let ic = [5.0; 8];

        let probs = ceac_kernel(&[2.0], &ie, &ic, &layout);
        // 2 * ie - 5 > 0 for ie = 3, 4
        assert_eq!(probs, vec![0.5, 0.0]);
    }

    #[test]
    fn test_nan_only_affects_its_strategy() {
        let layout = Layout::new(DrawOrder::GroupStrategySample, 1, 2, 2);
        let ie = [f64::NAN, 1.0, 1.0, 1.0];
        let ic = [0.0; 4];
        let probs = ceac_kernel(&[1.0], &ie, &ic, &layout);
        assert!(probs[0].is_nan());
        assert_eq!(probs[1], 1.0);
    }
}
