//! Command-line interface definition for tally.
//!
//! # Command Structure
//!
//! - `tally report` - Build report (and metrics) from a build document
//! - `tally metrics` - Metrics as JSON lines on stdout
//! - `tally check` - Validate a build document

mod commands;
mod validation;

use clap::Parser;
use std::path::PathBuf;

use crate::config::{ConfigOverrides, OutputOverrides};

pub use commands::{CheckArgs, Command, MetricsArgs, ReportArgs, TelemetryArgs};
pub use validation::parse_tag;

/// Tally - build reports and telemetry for JavaScript bundlers
#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Build reports and telemetry for JavaScript bundlers",
    long_about = "Tally turns the statistics of an esbuild, webpack, rspack, rollup or vite build\n\
                  into one canonical report of inputs, outputs and entries, and flattens that\n\
                  report into tagged metrics."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the config file (default: ./tally.config.json)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The configuration layer contributed by flags.
    pub fn overrides(&self) -> ConfigOverrides {
        match &self.command {
            Command::Report(args) => ConfigOverrides {
                telemetry: args.telemetry.overrides(),
                output: OutputOverrides {
                    report: args.out.clone(),
                    metrics: args.metrics.clone(),
                },
            },
            Command::Metrics(args) => ConfigOverrides {
                telemetry: args.telemetry.overrides(),
                ..Default::default()
            },
            Command::Check(_) => ConfigOverrides::default(),
        }
    }
}
