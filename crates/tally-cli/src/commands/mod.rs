//! Command implementations for the tally CLI.
//!
//! - [`report`] - Write the build report (and optionally metrics)
//! - [`metrics`] - Print metrics as JSON lines
//! - [`check`] - Validate a build document
//!
//! Each command provides an `execute` function that takes the parsed
//! arguments and the loaded configuration.

pub mod check;
pub mod metrics;
pub mod report;
pub(crate) mod utils;

pub use check::execute as check_execute;
pub use metrics::execute as metrics_execute;
pub use report::execute as report_execute;
