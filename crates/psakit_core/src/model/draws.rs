//! Draw records and the normalized draw table

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::ids::{GroupId, SampleId, StrategyId};
use crate::error::{PsaError, Result};

/// Name reported for the group key when the input had no group column
pub const DEFAULT_GROUP_KEY: &str = "grp_id";

/// One simulated outcome for one strategy and group in one parameter draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub sample: SampleId,
    pub strategy: StrategyId,
    pub group: GroupId,
    pub effect: f64,
    pub cost: f64,
}

/// Names of the strategy and group keys in the caller's data, carried through
/// to the result metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyNames {
    pub strategy: String,
    pub group: String,
}

impl Default for KeyNames {
    fn default() -> Self {
        Self {
            strategy: "strategy_id".to_string(),
            group: DEFAULT_GROUP_KEY.to_string(),
        }
    }
}

/// Normalized, immutable copy of the caller's draws.
///
/// Rows are sorted by (group, sample, strategy) and every
/// (sample, strategy, group) key is unique. Panel balance is not checked
/// here; each analysis checks it against its own reference strategy when it
/// builds a [`Panel`](crate::panel::Panel).
#[derive(Debug, Clone, PartialEq)]
pub struct DrawTable {
    draws: Vec<Draw>,
    strategies: Vec<StrategyId>,
    groups: Vec<GroupId>,
    keys: KeyNames,
}

impl DrawTable {
    /// Build a table from draws that already carry a group id.
    ///
    /// Rejects empty input and duplicate keys. Strategies and groups are listed
    /// in ascending id order; "first-listed" tie-breaking follows that order.
    pub fn new(mut draws: Vec<Draw>, keys: KeyNames) -> Result<Self> {
        if draws.is_empty() {
            return Err(PsaError::EmptyTable);
        }

        let mut seen = FxHashSet::default();
        seen.reserve(draws.len());
        for draw in &draws {
            if !seen.insert((draw.sample, draw.strategy, draw.group)) {
                return Err(PsaError::DuplicateDraw {
                    sample: draw.sample,
                    strategy: draw.strategy,
                    group: draw.group,
                });
            }
        }

        draws.sort_by_key(|d| (d.group, d.sample, d.strategy));

        let mut strategies: Vec<StrategyId> = draws.iter().map(|d| d.strategy).collect();
        strategies.sort_unstable();
        strategies.dedup();

        let mut groups: Vec<GroupId> = draws.iter().map(|d| d.group).collect();
        groups.dedup();

        Ok(Self {
            draws,
            strategies,
            groups,
            keys,
        })
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Strategy domain in ascending id order
    pub fn strategies(&self) -> &[StrategyId] {
        &self.strategies
    }

    /// Group domain in ascending id order
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn keys(&self) -> &KeyNames {
        &self.keys
    }

    /// Ordinal position of a strategy, failing if it is not in the strategy domain
    pub fn strategy_index(&self, strategy: StrategyId) -> Result<usize> {
        self.strategies
            .binary_search(&strategy)
            .map_err(|_| PsaError::UnknownComparator(strategy))
    }
}
