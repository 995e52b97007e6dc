//! Best strategy by expected NMB at each (threshold, group).

use serde::{Deserialize, Serialize};

use super::nmb::NmbRow;
use crate::config::WtpGrid;
use crate::model::{GroupId, StrategyId};

/// Strategy with the highest mean NMB in one group at one threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontierRow {
    pub k: f64,
    pub group: GroupId,
    pub best: StrategyId,
    /// Mean NMB of `best`
    pub enmb_best: f64,
    /// Ordinal position of `best` in the strategy domain
    #[serde(skip)]
    pub best_index: usize,
}

/// Index of the largest value; the first wins ties and NaN never wins unless
/// every value is NaN, in which case index 0 is returned.
pub(crate) fn argmax_first(values: impl IntoIterator<Item = f64>) -> (usize, f64) {
    let mut iter = values.into_iter().enumerate();
    let Some((_, first)) = iter.next() else {
        return (0, f64::NAN);
    };
    let mut best = (0, first);
    for (j, value) in iter {
        if value > best.1 || (best.1.is_nan() && !value.is_nan()) {
            best = (j, value);
        }
    }
    best
}

/// Pick the best strategy per (k, group) from an NMB summary laid out as
/// [`nmb_summary`](super::nmb::nmb_summary) produces it.
///
/// Rows are ordered by threshold (grid order), then group.
pub fn select_frontier(
    nmb: &[NmbRow],
    strategies: &[StrategyId],
    groups: &[GroupId],
    wtp: &WtpGrid,
) -> Vec<FrontierRow> {
    let n_k = wtp.len();
    let n_groups = groups.len();
    debug_assert_eq!(nmb.len(), strategies.len() * n_groups * n_k);

    let mut rows = Vec::with_capacity(n_k * n_groups);
    for (ki, &k) in wtp.thresholds().iter().enumerate() {
        for (g, &group) in groups.iter().enumerate() {
            let means = (0..strategies.len()).map(|j| nmb[(j * n_groups + g) * n_k + ki].mean);
            let (best_index, enmb_best) = argmax_first(means);
            rows.push(FrontierRow {
                k,
                group,
                best: strategies[best_index],
                enmb_best,
                best_index,
            });
        }
    }
    rows
}
