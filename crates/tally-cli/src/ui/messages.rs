//! One-line status messages on stderr.

use owo_colors::OwoColorize;

use super::colors_enabled;

/// What a status line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A file was written or a check passed
    Done,
    /// Progress
    Note,
    /// Something the user should look at; the command still succeeds
    Warn,
}

impl Status {
    fn marker(self) -> &'static str {
        match self {
            Status::Done => "✓",
            Status::Note => "ℹ",
            Status::Warn => "⚠",
        }
    }
}

/// The status line as printed, colored or plain.
pub fn status_line(status: Status, message: &str, colored: bool) -> String {
    let marker = status.marker();
    if !colored {
        return format!("{marker} {message}");
    }

    match status {
        Status::Done => format!("{} {message}", marker.green().bold()),
        Status::Note => format!("{} {message}", marker.blue().bold()),
        // Warnings color the whole line so they stand out in CI logs
        Status::Warn => format!("{} {}", marker.yellow().bold(), message.yellow()),
    }
}

pub fn status(status: Status, message: &str) {
    eprintln!("{}", status_line(status, message, colors_enabled()));
}
