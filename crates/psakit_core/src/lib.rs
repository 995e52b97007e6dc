//! Probabilistic sensitivity analysis summaries
//!
//! This crate turns a table of simulated (effect, cost) draws, one per
//! sample, strategy and group, into decision-analytic summary tables:
//! - Net monetary benefit (NMB) summaries over a willingness-to-pay grid
//! - The expected-NMB frontier and the probability each strategy is most
//!   cost-effective (MCE)
//! - Expected value of perfect information (EVPI)
//! - Incremental draws against a comparator, acceptability curves (CEAC)
//!   and incremental NMB
//! - ICER tables with a dominance classification
//!
//! The engine is a pure function of its inputs and holds no state between calls.
//! With the `parallel` feature (on by default) kernels run across
//! (threshold, group) cells on the rayon thread pool.
//!
//! ```ignore
//! use psakit_core::{AnalysisConfig, ColumnRoles, DrawTable, StrategyId, cea, cea_pw, icer};
//!
//! let table = DrawTable::from_columns(&raw, &ColumnRoles::default())?;
//! let config = AnalysisConfig::default();
//!
//! let whole = cea(&table, &config)?;
//! let pairwise = cea_pw(&table, StrategyId(1), &config)?;
//! let icers = icer(&pairwise, 50_000.0, 0.95)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod cea;
pub mod error;
pub mod grid;
pub mod icer;
pub mod normalize;
pub mod pairwise;
pub mod panel;
pub mod stats;

mod cells;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use cea::{CeaMeta, CeaResult, EvpiRow, FrontierRow, MceRow, NmbRow, SummaryRow, cea};
pub use config::{AnalysisConfig, WtpGrid, WtpSpec};
pub use error::{PsaError, Result};
pub use grid::{DrawOrder, Layout};
pub use icer::{Dominance, IcerRow, Outcome, classify, icer};
pub use model::{Draw, DrawTable, GroupId, KeyNames, SampleId, StrategyId};
pub use normalize::{ColumnRoles, CostRecord, ModelOutputs, OutcomeRecord, RawTable};
pub use pairwise::{
    CeacRow, DeltaRow, DeltaTable, PairwiseMeta, PairwiseResult, PairwiseSummaryRow, cea_pw,
    incremental,
};
pub use panel::Panel;
pub use stats::{Interval, ci_tails};
