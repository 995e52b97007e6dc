//! Identifiers for the three keys of a draw
//!
//! Each key has its own type so a sample id can never be passed where a
//! strategy id is expected.

use serde::{Deserialize, Serialize};

/// Index of one random parameter draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SampleId(pub u32);

/// Treatment strategy identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StrategyId(pub u32);

/// Subgroup identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl GroupId {
    /// Group assigned to every draw when the input has no group column
    pub const SENTINEL: GroupId = GroupId(1);
}
