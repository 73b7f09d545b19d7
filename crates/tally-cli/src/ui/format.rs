//! Formatting utilities for sizes, durations, and the entry summary.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;
use tally_report::BuildReport;

use super::colors_enabled;

/// Format file size in human-readable format.
///
/// ```
/// use tally_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use tally_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Entry names with the size of their main output, largest first.
pub fn summary_rows(report: &BuildReport) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = report
        .entries
        .iter()
        .map(|entry| (entry.name.clone(), entry.size))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// Print the entry size table to stderr.
pub fn print_entry_summary(report: &BuildReport) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);
    let rows = summary_rows(report);
    let name_width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let title = format!("{} build", report.bundler);
    if colors_enabled() {
        eprintln!("\n{}", title.bold().underline());
    } else {
        eprintln!("\n{title}");
    }
    eprintln!("{}", "─".repeat(width));

    for (name, size) in &rows {
        let size = format_size(*size);
        if colors_enabled() {
            eprintln!(
                "  {} {:<name_width$}  {}",
                "▸".blue(),
                name.bright_white().bold(),
                size.dimmed()
            );
        } else {
            eprintln!("  ▸ {name:<name_width$}  {size}");
        }
    }

    eprintln!("{}", "─".repeat(width));

    let mut totals = format!(
        "{} entries, {} outputs, {} inputs, {} total",
        report.entries.len(),
        report.outputs.len(),
        report.inputs.len(),
        format_size(report.total_output_size())
    );
    if let Some(ms) = report.duration_ms {
        totals.push_str(&format!(" in {}", format_duration(Duration::from_millis(ms))));
    }
    if colors_enabled() {
        eprintln!("  {} {}", "Total:".bold(), totals.green());
    } else {
        eprintln!("  Total: {totals}");
    }
}
