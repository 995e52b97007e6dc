//! ICER table at a single decision threshold.
//!
//! Reshapes the pairwise result into a long table with one row per
//! (strategy, group, outcome), each carrying the dominance label of its
//! (strategy, group).

mod dominance;

pub use dominance::{Dominance, classify};

use serde::{Deserialize, Serialize};

use crate::cea::{nmb_summary, outcome_summary};
use crate::config::WtpGrid;
use crate::error::Result;
use crate::model::{GroupId, StrategyId};
use crate::pairwise::{PairwiseResult, icer_ratio};
use crate::stats::{Interval, ci_tails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    IncrementalEffect,
    IncrementalCost,
    IncrementalNmb,
    Icer,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Outcome::IncrementalEffect,
        Outcome::IncrementalCost,
        Outcome::IncrementalNmb,
        Outcome::Icer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::IncrementalEffect => "Incremental effect",
            Outcome::IncrementalCost => "Incremental cost",
            Outcome::IncrementalNmb => "Incremental NMB",
            Outcome::Icer => "ICER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IcerRow {
    pub strategy: StrategyId,
    pub group: GroupId,
    pub outcome: Outcome,
    pub estimate: f64,
    /// `None` for the ICER, which is a ratio of means without an interval
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub dominance: Option<Dominance>,
}

impl IcerRow {
    /// Label shown in place of the numeric estimate, if any.
    ///
    /// Only the ICER outcome is replaced, and only when the dominance label
    /// makes the ratio meaningless.
    pub fn display_label(&self) -> Option<&'static str> {
        match (self.outcome, self.dominance) {
            (Outcome::Icer, Some(d)) if d.supersedes_ratio() => Some(d.label()),
            _ => None,
        }
    }
}

fn interval_row(
    strategy: StrategyId,
    group: GroupId,
    outcome: Outcome,
    interval: Interval,
    dominance: Option<Dominance>,
) -> IcerRow {
    IcerRow {
        strategy,
        group,
        outcome,
        estimate: interval.mean,
        lower: Some(interval.lower),
        upper: Some(interval.upper),
        dominance,
    }
}

/// Build the ICER table of `pairwise` at threshold `k`.
///
/// Intervals use the central `conf_level` quantiles of the incremental draws.
/// Rows are ordered by strategy, then group, then outcome in
/// [`Outcome::ALL`] order.
pub fn icer(pairwise: &PairwiseResult, k: f64, conf_level: f64) -> Result<Vec<IcerRow>> {
    let tails = ci_tails(conf_level)?;
    let grid = WtpGrid::single(k)?;
    let panel = pairwise.delta.panel();

    // Both tables are ordered (strategy, group); the NMB table has one k
    let outcomes = outcome_summary(panel, tails);
    let inmb = nmb_summary(panel, &grid, tails);

    let mut rows = Vec::with_capacity(outcomes.len() * Outcome::ALL.len());
    for (summary, nmb) in outcomes.iter().zip(&inmb) {
        let ie = summary.effect;
        let ic = summary.cost;
        let nmb_interval = Interval {
            mean: nmb.mean,
            lower: nmb.lower,
            upper: nmb.upper,
        };
        let dominance = classify(ic.mean, ie.mean, nmb.mean);
        let (strategy, group) = (summary.strategy, summary.group);

        rows.push(interval_row(strategy, group, Outcome::IncrementalEffect, ie, dominance));
        rows.push(interval_row(strategy, group, Outcome::IncrementalCost, ic, dominance));
        rows.push(interval_row(strategy, group, Outcome::IncrementalNmb, nmb_interval, dominance));
        rows.push(IcerRow {
            strategy,
            group,
            outcome: Outcome::Icer,
            estimate: icer_ratio(ic.mean, ie.mean),
            lower: None,
            upper: None,
            dominance,
        });
    }

    tracing::debug!(k, conf_level, rows = rows.len(), "built ICER table");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::error::PsaError;
    use crate::model::{Draw, DrawTable, KeyNames, SampleId};
    use crate::pairwise::cea_pw;

    fn pairwise(treatment_cost: f64) -> PairwiseResult {
        let mut draws = Vec::new();
        for s in 1..=3 {
            draws.push(Draw {
                sample: SampleId(s),
                strategy: StrategyId(1),
                group: GroupId(1),
                effect: 1.0,
                cost: 10.0,
            });
            draws.push(Draw {
                sample: SampleId(s),
                strategy: StrategyId(2),
                group: GroupId(1),
                effect: 2.0,
                cost: treatment_cost,
            });
        }
        let table = DrawTable::new(draws, KeyNames::default()).unwrap();
        cea_pw(&table, StrategyId(1), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_long_layout() {
        let rows = icer(&pairwise(20.0), 15.0, 0.95).unwrap();
        assert_eq!(rows.len(), 4);
        let outcomes: Vec<Outcome> = rows.iter().map(|r| r.outcome).collect();
        assert_eq!(outcomes, Outcome::ALL);

        assert_eq!(rows[0].estimate, 1.0);
        assert_eq!(rows[1].estimate, 10.0);
        assert_eq!(rows[2].estimate, 5.0);
        assert_eq!(rows[2].lower, Some(5.0));
        assert_eq!(rows[3].estimate, 10.0);
        assert_eq!(rows[3].lower, None);
        assert!(rows.iter().all(|r| r.dominance == Some(Dominance::CostEffective)));
        assert_eq!(rows[3].display_label(), None);
    }

    #[test]
    fn test_dominant_strategy_replaces_ratio() {
        // Treatment is cheaper and more effective
        let rows = icer(&pairwise(5.0), 15.0, 0.95).unwrap();
        let ratio = rows.iter().find(|r| r.outcome == Outcome::Icer).unwrap();
        assert_eq!(ratio.dominance, Some(Dominance::Dominates));
        assert_eq!(ratio.display_label(), Some("Dominates"));
        // Other outcomes keep their numbers
        assert_eq!(rows[1].display_label(), None);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let pw = pairwise(20.0);
        assert_eq!(
            icer(&pw, 15.0, 1.0),
            Err(PsaError::InvalidConfidenceLevel(1.0))
        );
        assert!(icer(&pw, -1.0, 0.95).is_err());
        assert!(icer(&pw, f64::INFINITY, 0.95).is_err());
    }
}
