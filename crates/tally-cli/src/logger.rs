//! Logging for the tally CLI.
//!
//! Structured logging via `tracing`. The level is chosen in this order:
//!
//! 1. `--verbose`: DEBUG for the tally crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`: custom filter
//! 4. `logLevel` from the configuration (INFO by default)
//!
//! Logs go to stderr so `tally metrics` output stays pipeable.

use tally_report::LogLevel;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const TALLY_CRATES: &[&str] = &["tally", "tally_cli", "tally_report", "tally_graph"];

/// Initialize the tracing subscriber.
///
/// Should be called once at the start of the program. Later calls are no-ops.
///
/// ```rust,no_run
/// use tally_cli::logger::init_logger;
/// use tally_report::LogLevel;
///
/// init_logger(false, false, true, LogLevel::Info);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, level: LogLevel) {
    let filter = select_filter(verbose, quiet, level);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && crate::ui::should_use_color())
        .without_time()
        .compact();

    // Tests and embedders may have installed a subscriber already
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn select_filter(verbose: bool, quiet: bool, level: LogLevel) -> EnvFilter {
    if verbose {
        EnvFilter::new(crate_directives(LogLevel::Debug))
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(crate_directives(level)))
    }
}

/// `tally=<level>,tally_cli=<level>,...`, everything else stays at warn.
pub fn crate_directives(level: LogLevel) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(TALLY_CRATES.iter().map(|name| format!("{name}={level}")));
    directives.join(",")
}
