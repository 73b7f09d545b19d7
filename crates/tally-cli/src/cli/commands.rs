use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::validation::parse_tag;
use crate::config::TelemetryOverrides;

/// Available tally subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a report from a build document
    ///
    /// Runs the build document through the bundler adapter, the dependency
    /// graph and the report aggregator, then writes the report as JSON.
    Report(ReportArgs),

    /// Print the metrics of a build as JSON lines
    Metrics(MetricsArgs),

    /// Validate a build document
    ///
    /// Fails with a diagnostic when the bundler options or stats cannot be
    /// turned into a report.
    Check(CheckArgs),
}

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Build document written by a bundler plugin (`-` for stdin)
    #[arg(value_name = "BUILD_JSON")]
    pub build: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Also write the metrics to this file
    #[arg(short, long, value_name = "FILE")]
    pub metrics: Option<PathBuf>,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,
}

/// Arguments for the metrics command
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Build document written by a bundler plugin (`-` for stdin)
    #[arg(value_name = "BUILD_JSON")]
    pub build: PathBuf,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Build document written by a bundler plugin (`-` for stdin)
    #[arg(value_name = "BUILD_JSON")]
    pub build: PathBuf,
}

/// Metric post-processing flags shared by `report` and `metrics`
#[derive(Args, Debug, Clone, Default)]
pub struct TelemetryArgs {
    /// Prefix every metric name
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Add a tag to every metric (repeatable)
    ///
    /// Examples:
    ///   tally metrics build.json --tag env:ci --tag team:web
    #[arg(long = "tag", value_name = "KEY:VALUE", value_parser = parse_tag)]
    pub tags: Vec<String>,

    /// Keep every metric (skip the default filters)
    #[arg(long)]
    pub no_filters: bool,
}

impl TelemetryArgs {
    pub fn overrides(&self) -> TelemetryOverrides {
        TelemetryOverrides {
            prefix: self.prefix.clone(),
            tags: self.tags.clone(),
            default_filters: self.no_filters.then_some(false),
        }
    }
}
