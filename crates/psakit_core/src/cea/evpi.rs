//! Expected value of perfect information.

use serde::{Deserialize, Serialize};

use super::frontier::FrontierRow;
use crate::cells::for_each_cell;
use crate::config::WtpGrid;
use crate::grid::Layout;
use crate::model::{GroupId, StrategyId};
use crate::panel::Panel;

/// EVPI in one group at one threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvpiRow {
    pub k: f64,
    pub group: GroupId,
    /// Strategy chosen under current information (highest mean NMB)
    pub best: StrategyId,
    /// Mean NMB of `best`
    pub enmb_current_info: f64,
    /// Mean over draws of the per-draw maximum NMB
    pub enmb_perfect_info: f64,
    pub evpi: f64,
}

/// Expected NMB of one (k, group) cell under current and perfect information
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnmbCell {
    pub current_info: f64,
    pub perfect_info: f64,
}

/// Larger of two values, NaN if either is NaN
#[inline]
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if b > a {
        b
    } else {
        a
    }
}

/// Expected NMB under current and perfect information, ordered `[k][group]`.
///
/// `best[cell]` is the ordinal index of the strategy fixed for that cell.
/// Both sums run over draws in the same order and each per-draw maximum is at
/// least the fixed strategy's NMB, so `perfect_info >= current_info` holds
/// exactly for finite inputs.
pub fn evpi_kernel(
    wtp: &[f64],
    effect: &[f64],
    cost: &[f64],
    layout: &Layout,
    best: &[usize],
) -> Vec<EnmbCell> {
    let n_groups = layout.n_groups();
    let n_samples = layout.n_samples();
    let n_strategies = layout.n_strategies();
    debug_assert_eq!(best.len(), wtp.len() * n_groups);

    let mut cells = vec![EnmbCell::default(); wtp.len() * n_groups];
    for_each_cell(&mut cells, 1, |cell, out| {
        let k = wtp[cell / n_groups];
        let g = cell % n_groups;
        let fixed = best[cell];
        let mut current = 0.0;
        let mut perfect = 0.0;

        for s in 0..n_samples {
            let mut max_nmb = f64::NEG_INFINITY;
            for j in 0..n_strategies {
                let at = layout.offset(g, s, j);
                let nmb = k * effect[at] - cost[at];
                max_nmb = nan_max(max_nmb, nmb);
                if j == fixed {
                    current += nmb;
                }
            }
            perfect += max_nmb;
        }

        let n = n_samples as f64;
        out[0] = EnmbCell {
            current_info: current / n,
            perfect_info: perfect / n,
        };
    });

    cells
}

/// EVPI rows for every (k, group), using the frontier's fixed strategy
pub(crate) fn evpi_table(panel: &Panel, wtp: &WtpGrid, frontier: &[FrontierRow]) -> Vec<EvpiRow> {
    let best: Vec<usize> = frontier.iter().map(|f| f.best_index).collect();
    let cells = evpi_kernel(
        wtp.thresholds(),
        panel.effect(),
        panel.cost(),
        panel.layout(),
        &best,
    );

    cells
        .iter()
        .zip(frontier)
        .map(|(cell, front)| EvpiRow {
            k: front.k,
            group: front.group,
            best: front.best,
            enmb_current_info: cell.current_info,
            enmb_perfect_info: cell.perfect_info,
            evpi: cell.perfect_info - cell.current_info,
        })
        .collect()
}
