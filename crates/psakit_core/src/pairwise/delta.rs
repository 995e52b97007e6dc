//! Incremental draws relative to a comparator.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{PsaError, Result};
use crate::grid::{DrawOrder, Layout};
use crate::model::{DrawTable, GroupId, SampleId, StrategyId};
use crate::panel::Panel;

/// Incremental outcome of one treatment draw against the comparator draw
/// with the same sample and group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaRow {
    pub sample: SampleId,
    pub strategy: StrategyId,
    pub group: GroupId,
    pub incremental_effect: f64,
    pub incremental_cost: f64,
}

/// Incremental draws of every non-comparator strategy.
///
/// Stored as a panel in (group, strategy, sample) order whose strategies are
/// the treatments, so the NMB summary and the CEAC kernel run on it unchanged.
/// Serializes as a sequence of [`DeltaRow`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaTable {
    panel: Panel,
    comparator: StrategyId,
    comparator_index: usize,
}

impl DeltaTable {
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn comparator(&self) -> StrategyId {
        self.comparator
    }

    /// Ordinal position of the comparator among all strategies of the input
    pub fn comparator_index(&self) -> usize {
        self.comparator_index
    }

    /// Treatment strategies, in input order with the comparator removed
    pub fn strategies(&self) -> &[StrategyId] {
        self.panel.strategies()
    }

    pub fn len(&self) -> usize {
        self.panel.layout().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows in (group, strategy, sample) order
    pub fn rows(&self) -> impl Iterator<Item = DeltaRow> + '_ {
        let layout = self.panel.layout();
        let strategies = self.panel.strategies();
        self.panel
            .groups()
            .iter()
            .enumerate()
            .flat_map(move |(g, &group)| {
                strategies.iter().enumerate().flat_map(move |(j, &strategy)| {
                    (0..layout.n_samples()).map(move |s| {
                        let (incremental_effect, incremental_cost) = self.panel.get(g, s, j);
                        DeltaRow {
                            sample: self.panel.sample_id(g, s),
                            strategy,
                            group,
                            incremental_effect,
                            incremental_cost,
                        }
                    })
                })
            })
    }
}

impl Serialize for DeltaTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// Subtract the comparator's draw from every treatment draw in the same
/// sample and group.
///
/// Fails if the comparator is not a strategy of `table`, if it is the only
/// strategy, or if in any group a treatment's sample ids differ from the
/// comparator's.
pub fn incremental(table: &DrawTable, comparator: StrategyId) -> Result<DeltaTable> {
    let comparator_index = table.strategy_index(comparator)?;
    if table.strategies().len() < 2 {
        return Err(PsaError::NoTreatmentStrategies);
    }

    let panel = Panel::build(table, DrawOrder::GroupStrategySample, comparator)?;
    let source = panel.layout();
    let treatments: Vec<StrategyId> = panel
        .strategies()
        .iter()
        .copied()
        .filter(|&s| s != comparator)
        .collect();

    let layout = Layout::new(
        DrawOrder::GroupStrategySample,
        source.n_groups(),
        source.n_samples(),
        treatments.len(),
    );
    let mut effect = Vec::with_capacity(layout.len());
    let mut cost = Vec::with_capacity(layout.len());

    for g in 0..source.n_groups() {
        for j in (0..source.n_strategies()).filter(|&j| j != comparator_index) {
            for s in 0..source.n_samples() {
                let (e, c) = panel.get(g, s, j);
                let (e0, c0) = panel.get(g, s, comparator_index);
                effect.push(e - e0);
                cost.push(c - c0);
            }
        }
    }

    let samples = (0..source.n_groups())
        .flat_map(|g| (0..source.n_samples()).map(move |s| (g, s)))
        .map(|(g, s)| panel.sample_id(g, s))
        .collect();

    tracing::debug!(
        comparator = comparator.0,
        treatments = treatments.len(),
        rows = effect.len(),
        "built incremental draws"
    );

    Ok(DeltaTable {
        panel: Panel::from_parts(
            layout,
            treatments,
            panel.groups().to_vec(),
            samples,
            effect,
            cost,
        ),
        comparator,
        comparator_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Draw, KeyNames};

    fn table() -> DrawTable {
        let mut draws = Vec::new();
        for g in 1..=2 {
            for s in 1..=3 {
                for j in 1..=3 {
                    draws.push(Draw {
                        sample: SampleId(s),
                        strategy: StrategyId(j),
                        group: GroupId(g),
                        effect: f64::from(j * s),
                        cost: f64::from(10 * j + g),
                    });
                }
            }
        }
        DrawTable::new(draws, KeyNames::default()).unwrap()
    }

    #[test]
    fn test_one_row_per_treatment_sample_group() {
        let delta = incremental(&table(), StrategyId(2)).unwrap();
        assert_eq!(delta.len(), 2 * 2 * 3);
        assert_eq!(delta.strategies(), &[StrategyId(1), StrategyId(3)]);
        assert_eq!(delta.comparator_index(), 1);

        let rows: Vec<DeltaRow> = delta.rows().collect();
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.strategy != StrategyId(2)));

        // Group 1, strategy 3, sample 2: effect 6 - 4, cost 31 - 21
        let row = rows[4];
        assert_eq!(
            row,
            DeltaRow {
                sample: SampleId(2),
                strategy: StrategyId(3),
                group: GroupId(1),
                incremental_effect: 2.0,
                incremental_cost: 10.0,
            }
        );
    }

    #[test]
    fn test_unknown_comparator() {
        assert_eq!(
            incremental(&table(), StrategyId(9)),
            Err(PsaError::UnknownComparator(StrategyId(9)))
        );
    }

    #[test]
    fn test_single_strategy_has_no_treatments() {
        let draws = vec![Draw {
            sample: SampleId(1),
            strategy: StrategyId(1),
            group: GroupId(1),
            effect: 1.0,
            cost: 1.0,
        }];
        let table = DrawTable::new(draws, KeyNames::default()).unwrap();
        assert_eq!(
            incremental(&table, StrategyId(1)),
            Err(PsaError::NoTreatmentStrategies)
        );
    }

    #[test]
    fn test_misaligned_samples_fail() {
        let mut draws = table().draws().to_vec();
        // Relabel one treatment draw so the row count still matches
        for d in &mut draws {
            if d.group == GroupId(2) && d.strategy == StrategyId(3) && d.sample == SampleId(3) {
                d.sample = SampleId(4);
            }
        }
        let table = DrawTable::new(draws, KeyNames::default()).unwrap();
        assert_eq!(
            incremental(&table, StrategyId(1)),
            Err(PsaError::UnbalancedPanel {
                group: GroupId(2),
                strategy: StrategyId(3),
                reference: StrategyId(1),
            })
        );
    }

    #[test]
    fn test_rows_start_with_first_treatment() {
        let delta = incremental(&table(), StrategyId(1)).unwrap();
        let rows: Vec<DeltaRow> = delta.rows().collect();
        assert_eq!(rows.len(), delta.len());
        assert_eq!(rows[0].sample, SampleId(1));
        assert_eq!(rows[0].strategy, StrategyId(2));
    }
}
