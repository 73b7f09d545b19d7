//! Check command implementation.
//!
//! Validates a build document without writing anything.

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::config::TallyConfig;
use crate::error::Result;
use crate::ui::{self, Status};
use tally_graph::NativeRuntime;
use tally_report::try_process_build;

/// Execute the check command.
///
/// # Errors
///
/// Returns the first adapter, stats or graph error as-is, so `main` renders
/// it with its diagnostic code and help.
pub async fn execute(args: CheckArgs, config: &TallyConfig) -> Result<()> {
    ui::status(Status::Note, &format!("Checking {}...", args.build.display()));

    let input = utils::read_build_input(&args.build).await?;
    let bundler = input.bundler;
    let (report, metrics) = try_process_build(input, &config.telemetry, &NativeRuntime::new())?;

    for warning in &report.warnings {
        ui::status(Status::Warn, warning);
    }
    if !report.errors.is_empty() {
        let message = format!("The build itself reported {} error(s)", report.errors.len());
        ui::status(Status::Warn, &message);
    }

    let summary = format!(
        "{bundler} build is valid: {} entries, {} outputs, {} inputs, {} metrics",
        report.entries.len(),
        report.outputs.len(),
        report.inputs.len(),
        metrics.len()
    );
    ui::status(Status::Done, &summary);
    Ok(())
}
