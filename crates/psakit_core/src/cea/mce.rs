//! Probability that each strategy is the most cost-effective.
//!
//! For every threshold and group, each draw votes for the strategy with the
//! highest NMB in that draw; the vote shares are the MCE probabilities.

use serde::{Deserialize, Serialize};

use super::frontier::FrontierRow;
use crate::cells::for_each_cell;
use crate::config::WtpGrid;
use crate::grid::Layout;
use crate::model::{GroupId, StrategyId};
use crate::panel::Panel;

/// Probability that `strategy` has the highest NMB in `group` at `k`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MceRow {
    pub k: f64,
    pub strategy: StrategyId,
    pub group: GroupId,
    /// Whether `strategy` has the highest mean NMB here (the frontier choice)
    pub best: bool,
    pub prob: f64,
}

/// MCE probabilities as a flat array ordered `[k][group][strategy]`.
///
/// `effect` and `cost` are addressed through `layout`. Each (k, group) cell
/// keeps only its strategy counters, written directly into the output. Exact
/// ties go to the lower strategy index. A cell in which any NMB is NaN
/// reports NaN for every strategy.
pub fn mce_kernel(wtp: &[f64], effect: &[f64], cost: &[f64], layout: &Layout) -> Vec<f64> {
    let n_groups = layout.n_groups();
    let n_samples = layout.n_samples();
    let n_strategies = layout.n_strategies();
    let mut probs = vec![0.0; wtp.len() * n_groups * n_strategies];

    for_each_cell(&mut probs, n_strategies, |cell, counts| {
        let k = wtp[cell / n_groups];
        let g = cell % n_groups;
        let mut saw_nan = false;

        for s in 0..n_samples {
            let mut best = 0;
            let mut best_nmb = f64::NEG_INFINITY;
            for j in 0..n_strategies {
                let at = layout.offset(g, s, j);
                let nmb = k * effect[at] - cost[at];
                saw_nan |= nmb.is_nan();
                if j == 0 || nmb > best_nmb {
                    best = j;
                    best_nmb = nmb;
                }
            }
            counts[best] += 1.0;
        }

        if saw_nan {
            counts.fill(f64::NAN);
        } else {
            let n = n_samples as f64;
            counts.iter_mut().for_each(|c| *c /= n);
        }
    });

    probs
}

/// MCE rows for every (k, group, strategy), flagged with the frontier choice
pub(crate) fn mce_table(panel: &Panel, wtp: &WtpGrid, frontier: &[FrontierRow]) -> Vec<MceRow> {
    let probs = mce_kernel(
        wtp.thresholds(),
        panel.effect(),
        panel.cost(),
        panel.layout(),
    );
    let strategies = panel.strategies();

    probs
        .chunks(strategies.len())
        .zip(frontier)
        .flat_map(|(cell, front)| {
            cell.iter()
                .zip(strategies)
                .enumerate()
                .map(move |(j, (&prob, &strategy))| MceRow {
                    k: front.k,
                    strategy,
                    group: front.group,
                    best: j == front.best_index,
                    prob,
                })
        })
        .collect()
}
