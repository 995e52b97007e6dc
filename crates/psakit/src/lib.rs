//! Command-line front end for psakit_core
//!
//! Reads PSA draws from CSV, runs the whole-population or pairwise analysis,
//! and writes the result tables as JSON or prints a formatted ICER table.

pub mod commands;
pub mod config;
pub mod input;
pub mod logging;
pub mod util;

pub use config::RunConfig;
pub use logging::init_logging;
