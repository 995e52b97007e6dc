//! Balanced draw panels in flat, stride-addressed storage.

use crate::error::{PsaError, Result};
use crate::grid::{DrawOrder, Layout};
use crate::model::{Draw, DrawTable, GroupId, SampleId, StrategyId};

/// Effect and cost draws of a balanced panel, stored as flat arrays.
///
/// Within every group all strategies share the same sample ids, and every
/// group has the same number of samples, so position `s` on the sample axis
/// names the same draw for every strategy of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    layout: Layout,
    strategies: Vec<StrategyId>,
    groups: Vec<GroupId>,
    /// Sample ids per group, `[group][sample]`
    samples: Vec<SampleId>,
    effect: Vec<f64>,
    cost: Vec<f64>,
}

impl Panel {
    /// Check panel balance against `reference` and lay the draws out in `order`.
    ///
    /// Fails with [`PsaError::UnbalancedPanel`] when, within some group, a
    /// strategy's sample ids differ from the reference strategy's, and with
    /// [`PsaError::UnequalSampleCounts`] when groups differ in size.
    pub fn build(table: &DrawTable, order: DrawOrder, reference: StrategyId) -> Result<Self> {
        let strategies = table.strategies().to_vec();
        let groups = table.groups().to_vec();
        let reference_index = table.strategy_index(reference)?;

        let mut by_strategy: Vec<&Draw> = table.draws().iter().collect();
        by_strategy.sort_by_key(|d| (d.group, d.strategy, d.sample));

        let mut n_samples = None;
        let mut samples = Vec::new();
        let mut start = 0;
        for &group in &groups {
            let end = start + by_strategy[start..].partition_point(|d| d.group == group);
            let rows = &by_strategy[start..end];
            start = end;

            // Sample ids per strategy, in strategy-domain order
            let mut per_strategy: Vec<&[&Draw]> = Vec::with_capacity(strategies.len());
            let mut offset = 0;
            for &strategy in &strategies {
                let len = rows[offset..].partition_point(|d| d.strategy == strategy);
                per_strategy.push(&rows[offset..offset + len]);
                offset += len;
            }

            let reference_rows = per_strategy[reference_index];
            for (j, rows) in per_strategy.iter().enumerate() {
                let same = rows.len() == reference_rows.len()
                    && rows
                        .iter()
                        .zip(reference_rows)
                        .all(|(a, b)| a.sample == b.sample);
                if !same {
                    return Err(PsaError::UnbalancedPanel {
                        group,
                        strategy: strategies[j],
                        reference,
                    });
                }
            }

            let expected = *n_samples.get_or_insert(reference_rows.len());
            if reference_rows.len() != expected {
                return Err(PsaError::UnequalSampleCounts {
                    group,
                    expected,
                    found: reference_rows.len(),
                });
            }
            samples.extend(reference_rows.iter().map(|d| d.sample));
        }

        let n_samples = n_samples.unwrap_or(0);
        let layout = Layout::new(order, groups.len(), n_samples, strategies.len());
        let mut effect = vec![0.0; layout.len()];
        let mut cost = vec![0.0; layout.len()];

        // `by_strategy` is exactly (group, strategy, sample) order, so its
        // position decodes to the three ordinal indices.
        let per_group = strategies.len() * n_samples;
        for (i, draw) in by_strategy.iter().enumerate() {
            let g = i / per_group;
            let j = (i % per_group) / n_samples;
            let s = i % n_samples;
            let at = layout.offset(g, s, j);
            effect[at] = draw.effect;
            cost[at] = draw.cost;
        }

        Ok(Self {
            layout,
            strategies,
            groups,
            samples,
            effect,
            cost,
        })
    }

    /// Assemble a panel from arrays already laid out by `layout`
    pub(crate) fn from_parts(
        layout: Layout,
        strategies: Vec<StrategyId>,
        groups: Vec<GroupId>,
        samples: Vec<SampleId>,
        effect: Vec<f64>,
        cost: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(effect.len(), layout.len());
        debug_assert_eq!(cost.len(), layout.len());
        debug_assert_eq!(samples.len(), layout.n_groups() * layout.n_samples());
        Self {
            layout,
            strategies,
            groups,
            samples,
            effect,
            cost,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn strategies(&self) -> &[StrategyId] {
        &self.strategies
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn n_samples(&self) -> usize {
        self.layout.n_samples()
    }

    /// Sample id at ordinal position `sample` of group `group`
    pub fn sample_id(&self, group: usize, sample: usize) -> SampleId {
        self.samples[group * self.layout.n_samples() + sample]
    }

    pub fn effect(&self) -> &[f64] {
        &self.effect
    }

    pub fn cost(&self) -> &[f64] {
        &self.cost
    }

    /// Effect and cost of one draw, by ordinal indices
    #[inline]
    pub fn get(&self, group: usize, sample: usize, strategy: usize) -> (f64, f64) {
        let at = self.layout.offset(group, sample, strategy);
        (self.effect[at], self.cost[at])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeyNames;

    fn draw(sample: u32, strategy: u32, group: u32) -> Draw {
        Draw {
            sample: SampleId(sample),
            strategy: StrategyId(strategy),
            group: GroupId(group),
            effect: f64::from(100 * group + 10 * strategy + sample),
            cost: -f64::from(100 * group + 10 * strategy + sample),
        }
    }

    fn balanced() -> DrawTable {
        let mut draws = Vec::new();
        for g in 1..=2 {
            for s in [4, 9, 6] {
                for j in 1..=3 {
                    draws.push(draw(s, j, g));
                }
            }
        }
        DrawTable::new(draws, KeyNames::default()).unwrap()
    }

    #[test]
    fn test_layouts_address_the_same_draws() {
        let table = balanced();
        for order in [DrawOrder::GroupSampleStrategy, DrawOrder::GroupStrategySample] {
            let panel = Panel::build(&table, order, StrategyId(1)).unwrap();
            assert_eq!(panel.n_samples(), 3);
            // Samples are listed in ascending id order within each group
            assert_eq!(panel.sample_id(1, 0), SampleId(4));
            assert_eq!(panel.sample_id(1, 1), SampleId(6));
            assert_eq!(panel.sample_id(1, 2), SampleId(9));
            assert_eq!(panel.get(1, 2, 0), (219.0, -219.0));
            assert_eq!(panel.get(0, 0, 2), (134.0, -134.0));
        }
    }

    #[test]
    fn test_group_sample_strategy_is_contiguous_per_draw() {
        let panel =
            Panel::build(&balanced(), DrawOrder::GroupSampleStrategy, StrategyId(1)).unwrap();
        assert_eq!(&panel.effect()[0..3], &[114.0, 124.0, 134.0]);
    }

    #[test]
    fn test_missing_sample_is_unbalanced() {
        let mut draws: Vec<Draw> = balanced().draws().to_vec();
        draws.retain(|d| {
            !(d.group == GroupId(2) && d.strategy == StrategyId(3) && d.sample == SampleId(6))
        });
        let table = DrawTable::new(draws, KeyNames::default()).unwrap();

        assert_eq!(
            Panel::build(&table, DrawOrder::GroupStrategySample, StrategyId(1)),
            Err(PsaError::UnbalancedPanel {
                group: GroupId(2),
                strategy: StrategyId(3),
                reference: StrategyId(1),
            })
        );
    }

    #[test]
    fn test_mismatched_sample_ids_are_unbalanced() {
        let mut draws: Vec<Draw> = balanced().draws().to_vec();
        for d in &mut draws {
            if d.group == GroupId(1) && d.strategy == StrategyId(2) && d.sample == SampleId(9) {
                d.sample = SampleId(10);
            }
        }
        let table = DrawTable::new(draws, KeyNames::default()).unwrap();

        assert_eq!(
            Panel::build(&table, DrawOrder::GroupSampleStrategy, StrategyId(2)),
            Err(PsaError::UnbalancedPanel {
                group: GroupId(1),
                strategy: StrategyId(1),
                reference: StrategyId(2),
            })
        );
    }

    #[test]
    fn test_unequal_group_sizes() {
        let mut draws: Vec<Draw> = balanced().draws().to_vec();
        draws.retain(|d| !(d.group == GroupId(2) && d.sample == SampleId(9)));
        let table = DrawTable::new(draws, KeyNames::default()).unwrap();

        assert_eq!(
            Panel::build(&table, DrawOrder::GroupSampleStrategy, StrategyId(1)),
            Err(PsaError::UnequalSampleCounts {
                group: GroupId(2),
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn test_unknown_reference() {
        assert_eq!(
            Panel::build(&balanced(), DrawOrder::GroupSampleStrategy, StrategyId(8)),
            Err(PsaError::UnknownComparator(StrategyId(8)))
        );
    }
}
