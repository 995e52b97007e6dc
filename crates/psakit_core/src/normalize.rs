//! Adapters that turn caller data into a normalized [`DrawTable`].
//!
//! Two input shapes are supported, each with its own explicit entry point:
//!
//! - [`DrawTable::from_columns`]: a flat numeric table with column-role bindings
//! - [`DrawTable::from_model_outputs`]: discounted effect and cost records as
//!   produced by an economic model, joined on (sample, strategy, group)
//!
//! Neither adapter mutates its input. When no group is supplied, every draw is
//! assigned [`GroupId::SENTINEL`] in the returned copy.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{PsaError, Result};
use crate::model::{DEFAULT_GROUP_KEY, Draw, DrawTable, GroupId, KeyNames, SampleId, StrategyId};

/// Cost category that holds the total across all cost components
pub const TOTAL_COST_CATEGORY: &str = "total";

/// Tolerance when matching a record's discount rate against the requested one
const DISCOUNT_RATE_TOLERANCE: f64 = 1e-9;

/// Named numeric columns, as read from a CSV file or assembled in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<(String, Vec<f64>)>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, replacing any existing column with the same name
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.push_column(name, values);
        self
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// Which column plays which role in a [`RawTable`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    pub sample: String,
    pub strategy: String,
    /// Optional; without it every draw belongs to [`GroupId::SENTINEL`]
    pub group: Option<String>,
    pub effect: String,
    pub cost: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            sample: "sample".to_string(),
            strategy: "strategy_id".to_string(),
            group: None,
            effect: "effect".to_string(),
            cost: "cost".to_string(),
        }
    }
}

impl ColumnRoles {
    fn key_names(&self) -> KeyNames {
        KeyNames {
            strategy: self.strategy.clone(),
            group: self
                .group
                .clone()
                .unwrap_or_else(|| DEFAULT_GROUP_KEY.to_string()),
        }
    }
}

/// Look up a role's column and check its length against the sample column
fn role_column<'a>(raw: &'a RawTable, name: &str, expected: Option<usize>) -> Result<&'a [f64]> {
    let column = raw
        .column(name)
        .ok_or_else(|| PsaError::MissingColumn(name.to_string()))?;
    if let Some(expected) = expected
        && column.len() != expected
    {
        return Err(PsaError::ColumnLengthMismatch {
            column: name.to_string(),
            expected,
            found: column.len(),
        });
    }
    Ok(column)
}

/// Convert a numeric id cell to `u32`, rejecting fractions, negatives and non-finite values
fn parse_id(column: &str, row: usize, value: f64) -> Result<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(PsaError::InvalidId {
            column: column.to_string(),
            row,
            value,
        })
    }
}

impl DrawTable {
    /// Normalize a flat table of draws.
    ///
    /// Effect and cost values are copied as-is, including NaN, which then
    /// propagates through every summary that aggregates it.
    pub fn from_columns(raw: &RawTable, roles: &ColumnRoles) -> Result<Self> {
        let samples = role_column(raw, &roles.sample, None)?;
        let n_rows = samples.len();
        let strategies = role_column(raw, &roles.strategy, Some(n_rows))?;
        let effects = role_column(raw, &roles.effect, Some(n_rows))?;
        let costs = role_column(raw, &roles.cost, Some(n_rows))?;
        let groups = roles
            .group
            .as_deref()
            .map(|name| role_column(raw, name, Some(n_rows)))
            .transpose()?;

        let mut draws = Vec::with_capacity(n_rows);
        for row in 0..n_rows {
            let group = match (groups, roles.group.as_deref()) {
                (Some(column), Some(name)) => GroupId(parse_id(name, row, column[row])?),
                _ => GroupId::SENTINEL,
            };
            draws.push(Draw {
                sample: SampleId(parse_id(&roles.sample, row, samples[row])?),
                strategy: StrategyId(parse_id(&roles.strategy, row, strategies[row])?),
                group,
                effect: effects[row],
                cost: costs[row],
            });
        }

        tracing::debug!(rows = n_rows, grouped = groups.is_some(), "normalized flat draws");
        DrawTable::new(draws, roles.key_names())
    }

    /// Normalize the discounted outcomes of an economic model.
    ///
    /// Effects are taken at discount rate `dr_effect`, costs at `dr_cost` from
    /// the [`TOTAL_COST_CATEGORY`] category. Every selected effect record must
    /// meet exactly one selected cost record with the same key and vice versa;
    /// a repeated key on either side is reported as [`PsaError::UnmatchedOutcome`].
    pub fn from_model_outputs(
        outputs: &ModelOutputs,
        dr_effect: f64,
        dr_cost: f64,
    ) -> Result<Self> {
        let key = |sample, strategy, group: Option<GroupId>| {
            (sample, strategy, group.unwrap_or(GroupId::SENTINEL))
        };

        let mut costs: FxHashMap<(SampleId, StrategyId, GroupId), f64> = FxHashMap::default();
        for record in outputs.costs.iter().filter(|r| {
            r.category == TOTAL_COST_CATEGORY
                && (r.discount_rate - dr_cost).abs() < DISCOUNT_RATE_TOLERANCE
        }) {
            let k = key(record.sample, record.strategy, record.group);
            if costs.insert(k, record.value).is_some() {
                return Err(PsaError::UnmatchedOutcome {
                    sample: k.0,
                    strategy: k.1,
                    group: k.2,
                });
            }
        }

        let mut draws = Vec::with_capacity(costs.len());
        for record in outputs
            .effects
            .iter()
            .filter(|r| (r.discount_rate - dr_effect).abs() < DISCOUNT_RATE_TOLERANCE)
        {
            let (sample, strategy, group) = key(record.sample, record.strategy, record.group);
            let cost = costs
                .remove(&(sample, strategy, group))
                .ok_or(PsaError::UnmatchedOutcome {
                    sample,
                    strategy,
                    group,
                })?;
            draws.push(Draw {
                sample,
                strategy,
                group,
                effect: record.value,
                cost,
            });
        }

        // Leftover costs had no effect partner. Report the smallest key so the
        // error does not depend on hash iteration order.
        if let Some(&(sample, strategy, group)) = costs.keys().min() {
            return Err(PsaError::UnmatchedOutcome {
                sample,
                strategy,
                group,
            });
        }

        tracing::debug!(rows = draws.len(), dr_effect, dr_cost, "normalized model outputs");
        DrawTable::new(draws, KeyNames::default())
    }
}

/// Discounted effect of one strategy in one draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub sample: SampleId,
    pub strategy: StrategyId,
    #[serde(default)]
    pub group: Option<GroupId>,
    pub discount_rate: f64,
    pub value: f64,
}

/// Discounted cost of one strategy in one draw, split by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub sample: SampleId,
    pub strategy: StrategyId,
    #[serde(default)]
    pub group: Option<GroupId>,
    pub discount_rate: f64,
    pub category: String,
    pub value: f64,
}

/// Outcome bundle of an economic model run over a PSA
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOutputs {
    pub effects: Vec<OutcomeRecord>,
    pub costs: Vec<CostRecord>,
}
