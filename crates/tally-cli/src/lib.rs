//! Tally CLI - build reports and telemetry metrics for JavaScript bundlers.
//!
//! This crate provides the `tally` binary. It reads the build document a
//! bundler shim writes at the end of a build (bundler options plus native
//! stats) and runs it through `tally-report`.
//!
//! # Architecture
//!
//! - [`cli`] - Argument parsing with clap
//! - [`commands`] - `report`, `metrics` and `check`
//! - [`config`] - Layered configuration (defaults, file, environment, flags)
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Status messages and the size summary
//!
//! # Example
//!
//! ```rust,no_run
//! use tally_cli::{config::TallyConfig, error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     let config = TallyConfig::load(None, &Default::default())?;
//!     logger::init_logger(false, false, true, config.log_level);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result};
