use thiserror::Error;

use crate::model::{GroupId, SampleId, StrategyId};

/// Errors raised while validating inputs or assembling analysis tables.
///
/// Every variant is permanent: the analysis is a pure function of its inputs,
/// so re-running with the same data reproduces the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PsaError {
    /// A column bound to a role is not present in the raw table
    #[error("column {0:?} not found in draw table")]
    MissingColumn(String),

    /// Columns of a raw table have different lengths
    #[error("column {column:?} has {found} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// An id column holds a value that is not a non-negative integer
    #[error("column {column:?} row {row}: {value} is not a valid id")]
    InvalidId {
        column: String,
        row: usize,
        value: f64,
    },

    /// The draw table has no rows
    #[error("draw table is empty")]
    EmptyTable,

    /// The same (sample, strategy, group) key appears twice
    #[error("duplicate draw for sample {sample:?}, strategy {strategy:?}, group {group:?}")]
    DuplicateDraw {
        sample: SampleId,
        strategy: StrategyId,
        group: GroupId,
    },

    /// A model-output key lacks its effect or cost partner, or appears twice on one side
    #[error("no matching outcome for sample {sample:?}, strategy {strategy:?}, group {group:?}")]
    UnmatchedOutcome {
        sample: SampleId,
        strategy: StrategyId,
        group: GroupId,
    },

    /// The comparator strategy is not among the strategies of the draw table
    #[error("comparator {0:?} is not one of the strategies in the draw table")]
    UnknownComparator(StrategyId),

    /// At least two strategies are needed for a pairwise comparison
    #[error("pairwise analysis needs at least one strategy besides the comparator")]
    NoTreatmentStrategies,

    /// Sample ids of a strategy differ from those of the reference strategy within a group
    #[error(
        "sample ids of strategy {strategy:?} differ from those of {reference:?} in group {group:?}"
    )]
    UnbalancedPanel {
        group: GroupId,
        strategy: StrategyId,
        reference: StrategyId,
    },

    /// Groups hold different numbers of samples, so they cannot share one stride layout
    #[error("group {group:?} has {found} samples, expected {expected}")]
    UnequalSampleCounts {
        group: GroupId,
        expected: usize,
        found: usize,
    },

    /// Confidence level outside the open interval (0, 1)
    #[error("confidence level {0} is not in the open interval (0, 1)")]
    InvalidConfidenceLevel(f64),

    /// The willingness-to-pay grid has no thresholds
    #[error("willingness-to-pay grid is empty")]
    EmptyWtpGrid,

    /// A willingness-to-pay threshold is negative or not finite
    #[error("willingness-to-pay threshold {value} at position {index} is negative or not finite")]
    InvalidThreshold { index: usize, value: f64 },

    /// A `{min, max, step}` grid specification cannot produce thresholds, or
    /// would produce more than `MAX_WTP_GRID_LEN` of them
    #[error("invalid willingness-to-pay range (min={min}, max={max}, step={step})")]
    InvalidWtpRange { min: f64, max: f64, step: f64 },
}

pub type Result<T> = std::result::Result<T, PsaError>;
