//! Whole-population cost-effectiveness analysis.
//!
//! Compares all strategies at once within each group:
//!
//! ```ignore
//! use psakit_core::{AnalysisConfig, DrawTable, cea};
//!
//! let table = DrawTable::from_columns(&raw, &roles)?;
//! let result = cea(&table, &AnalysisConfig::default())?;
//!
//! // Cost-effectiveness acceptability frontier
//! for row in result.ceaf() {
//!     println!("{} {:?} {}", row.k, row.strategy, row.prob);
//! }
//! ```
//!
//! Stages run in dependency order: the NMB summary feeds the frontier, and the
//! frontier fixes the strategy that the MCE table flags as best and that EVPI
//! measures current information against.

mod evpi;
mod frontier;
mod mce;
mod nmb;
mod summary;

pub use evpi::{EnmbCell, EvpiRow, evpi_kernel};
pub use frontier::{FrontierRow, select_frontier};
pub use mce::{MceRow, mce_kernel};
pub use nmb::{NmbRow, nmb_summary};
pub use summary::{SummaryRow, outcome_summary};

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::grid::DrawOrder;
use crate::model::DrawTable;
use crate::panel::Panel;

/// Key names carried from the input for downstream labelling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CeaMeta {
    pub strategy_key: String,
    pub group_key: String,
}

/// Output tables of the whole-population analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CeaResult {
    /// Effect and cost per (strategy, group)
    pub summary: Vec<SummaryRow>,
    /// Probability most cost-effective per (k, group, strategy)
    pub mce: Vec<MceRow>,
    /// EVPI per (k, group)
    pub evpi: Vec<EvpiRow>,
    /// NMB per (strategy, group, k)
    pub nmb: Vec<NmbRow>,
    /// Highest-mean-NMB strategy per (k, group)
    pub frontier: Vec<FrontierRow>,
    pub meta: CeaMeta,
}

impl CeaResult {
    /// MCE rows of the best-mean-NMB strategy at each (k, group): the
    /// cost-effectiveness acceptability frontier
    pub fn ceaf(&self) -> impl Iterator<Item = &MceRow> {
        self.mce.iter().filter(|row| row.best)
    }
}

/// Run the whole-population analysis.
///
/// Validates the threshold grid and interval level first, then checks panel
/// balance against the first-listed strategy.
pub fn cea(table: &DrawTable, config: &AnalysisConfig) -> Result<CeaResult> {
    let wtp = config.wtp_grid()?;
    let tails = config.tails()?;
    let panel = Panel::build(table, DrawOrder::GroupSampleStrategy, table.strategies()[0])?;

    tracing::info!(
        strategies = panel.strategies().len(),
        groups = panel.groups().len(),
        samples = panel.n_samples(),
        thresholds = wtp.len(),
        "running cost-effectiveness analysis"
    );

    let summary = outcome_summary(&panel, tails);
    let nmb = nmb_summary(&panel, &wtp, tails);
    let frontier = select_frontier(&nmb, panel.strategies(), panel.groups(), &wtp);
    tracing::debug!(rows = nmb.len(), "net monetary benefit summarized");

    let mce = mce::mce_table(&panel, &wtp, &frontier);
    let evpi = evpi::evpi_table(&panel, &wtp, &frontier);
    tracing::debug!(mce_rows = mce.len(), evpi_rows = evpi.len(), "decision kernels done");

    Ok(CeaResult {
        summary,
        mce,
        evpi,
        nmb,
        frontier,
        meta: CeaMeta {
            strategy_key: table.keys().strategy.clone(),
            group_key: table.keys().group.clone(),
        },
    })
}
