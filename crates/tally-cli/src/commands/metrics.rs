//! Metrics command implementation.
//!
//! Prints one JSON object per line so the output can be piped into a
//! metrics forwarder.

use crate::cli::MetricsArgs;
use crate::commands::utils;
use crate::config::TallyConfig;
use crate::error::Result;
use crate::ui::{self, Status};
use std::io::Write;
use tally_graph::NativeRuntime;
use tally_report::process_build;

/// Execute the metrics command.
pub async fn execute(args: MetricsArgs, config: &TallyConfig) -> Result<()> {
    let input = utils::read_build_input(&args.build).await?;
    let telemetry = utils::stamped(&config.telemetry);

    let outcome = process_build(input, &telemetry, &NativeRuntime::new());
    if let Some(error) = &outcome.error {
        ui::status(Status::Warn, &format!("No metrics: {error}"));
    }

    let mut stdout = std::io::stdout().lock();
    for metric in &outcome.metrics {
        serde_json::to_writer(&mut stdout, metric)?;
        writeln!(stdout)?;
    }
    stdout.flush()?;

    tracing::debug!(count = outcome.metrics.len(), "printed metrics");
    Ok(())
}
