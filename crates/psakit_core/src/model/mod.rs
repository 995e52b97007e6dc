mod draws;
mod ids;

pub use draws::{DEFAULT_GROUP_KEY, Draw, DrawTable, KeyNames};
pub use ids::{GroupId, SampleId, StrategyId};
