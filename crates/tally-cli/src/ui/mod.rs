//! Terminal output: status messages and the build size summary.
//!
//! Everything here writes to stderr. stdout is reserved for machine-readable
//! output (reports and metrics) so it can be piped.
//!
//! ```no_run
//! use tally_cli::ui;
//!
//! use tally_cli::ui::Status;
//!
//! ui::init_colors(false);
//! ui::status(Status::Done, "Report written to build.json");
//! ui::status(Status::Warn, "Build reported 2 warnings");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_duration, format_size, print_entry_summary, summary_rows};
pub use messages::{Status, status, status_line};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Decide once whether status output is colored.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    COLORS.store(enabled, Ordering::Relaxed);
    console::set_colors_enabled_stderr(enabled);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
