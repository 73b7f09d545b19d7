//! Report command implementation.

use crate::cli::ReportArgs;
use crate::commands::utils;
use crate::config::TallyConfig;
use crate::error::Result;
use crate::ui::{self, Status};
use tally_graph::NativeRuntime;
use tally_report::process_build;

/// Execute the report command.
///
/// 1. Read the build document
/// 2. Run it through the pipeline (never fails; errors yield an empty report)
/// 3. Write the report to `output.report` or stdout
/// 4. Write metrics when `output.metrics` is set
/// 5. Print the entry summary
pub async fn execute(args: ReportArgs, config: &TallyConfig) -> Result<()> {
    let input = utils::read_build_input(&args.build).await?;
    let telemetry = utils::stamped(&config.telemetry);

    let outcome = process_build(input, &telemetry, &NativeRuntime::new());
    if let Some(error) = &outcome.error {
        ui::status(Status::Warn, &format!("Report is empty: {error}"));
    }
    for warning in &outcome.report.warnings {
        tracing::info!("{warning}");
    }

    match &config.output.report {
        Some(path) => {
            utils::write_json(path, &outcome.report).await?;
            ui::status(Status::Done, &format!("Report written to {}", path.display()));
        }
        None => println!("{}", serde_json::to_string_pretty(&outcome.report)?),
    }

    if let Some(path) = &config.output.metrics {
        utils::write_json(path, &outcome.metrics).await?;
        let message = format!(
            "{} metrics written to {}",
            outcome.metrics.len(),
            path.display()
        );
        ui::status(Status::Done, &message);
    }

    ui::print_entry_summary(&outcome.report);
    Ok(())
}
