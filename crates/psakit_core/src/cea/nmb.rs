//! Net monetary benefit summaries over the willingness-to-pay grid.
//!
//! This is the descriptive, table-expansion estimator: for each
//! (strategy, group) it materializes the `n_samples` NMB values at one
//! threshold at a time and summarizes them. The decision kernels (MCE, EVPI,
//! CEAC) never take this route.

use serde::{Deserialize, Serialize};

use crate::cells::for_each_cell;
use crate::config::WtpGrid;
use crate::model::{GroupId, StrategyId};
use crate::panel::Panel;
use crate::stats::summarize;

/// Mean and interval of `k * effect - cost` for one strategy, group and threshold.
///
/// On a delta panel the same row holds incremental NMB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NmbRow {
    pub strategy: StrategyId,
    pub group: GroupId,
    pub k: f64,
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Summarize NMB for every (strategy, group, k).
///
/// Rows are ordered by strategy, then group, then threshold in grid order, so
/// the row for ordinal indices `(j, g, ki)` sits at
/// `(j * n_groups + g) * n_k + ki`.
pub fn nmb_summary(panel: &Panel, wtp: &WtpGrid, tails: (f64, f64)) -> Vec<NmbRow> {
    let layout = *panel.layout();
    let n_groups = layout.n_groups();
    let n_samples = layout.n_samples();
    let thresholds = wtp.thresholds();

    let placeholder = NmbRow {
        strategy: StrategyId(0),
        group: GroupId(0),
        k: f64::NAN,
        mean: f64::NAN,
        lower: f64::NAN,
        upper: f64::NAN,
    };
    let mut rows = vec![placeholder; layout.n_strategies() * n_groups * thresholds.len()];

    for_each_cell(&mut rows, thresholds.len(), |cell, out| {
        let (j, g) = (cell / n_groups, cell % n_groups);
        let strategy = panel.strategies()[j];
        let group = panel.groups()[g];
        let mut values = vec![0.0; n_samples];

        for (row, &k) in out.iter_mut().zip(thresholds) {
            for (s, value) in values.iter_mut().enumerate() {
                let (e, c) = panel.get(g, s, j);
                *value = k * e - c;
            }
            let interval = summarize(&mut values, tails);
            *row = NmbRow {
                strategy,
                group,
                k,
                mean: interval.mean,
                lower: interval.lower,
                upper: interval.upper,
            };
        }
    });

    rows
}
