//! Tally CLI entry point.
//!
//! Parses arguments, loads configuration, initializes logging and dispatches
//! to the command implementations.

use clap::Parser;
use miette::Result;
use tally_cli::{cli, commands, config, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let config = config::TallyConfig::load(args.config.as_deref(), &args.overrides())
        .map_err(miette::Report::new)?;

    logger::init_logger(args.verbose, args.quiet, args.no_color, config.log_level);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Report(report_args) => commands::report_execute(report_args, &config).await,
        cli::Command::Metrics(metrics_args) => {
            commands::metrics_execute(metrics_args, &config).await
        }
        cli::Command::Check(check_args) => commands::check_execute(check_args, &config).await,
    };

    // Rendered with their diagnostic code and help
    result.map_err(miette::Report::new)
}
