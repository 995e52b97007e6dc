//! Scenario tests for the analysis engine
//!
//! Tests are organized by topic:
//! - `worked_example` - Two-strategy example with hand-checked results
//! - `properties` - Invariants over randomly generated draws
//! - `inputs` - Normalization and validation through the public entry points

mod inputs;
