//! Output formatting and styling for the deft CLI.
//!
//! Routine messages are gated behind a global verbosity setting; errors are
//! always shown. Feature listings render either as aligned text columns or
//! as CSV rows.

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress all but the most important output.
    Quiet = 0,
    /// Default level.
    Normal = 1,
    /// Show verbose progress messages too.
    Verbose = 2,
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Prints an informational message (respects quiet mode).
pub fn info(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    println!("{message}");
}

/// Prints a verbose progress message (only in verbose mode).
pub fn verbose(message: &str) {
    if get_verbosity() != Verbosity::Verbose {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Prints an error message in bold red (always shown).
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// One row of a feature listing: status, priority, name.
pub type FeatureRow = (String, usize, String);

/// Renders rows as aligned text columns: status left-aligned, priority
/// right-aligned, name jagged.
#[must_use]
pub fn format_as_text(rows: &[FeatureRow]) -> String {
    let status_width = rows.iter().map(|(s, _, _)| s.len()).max().unwrap_or(0);
    let priority_width = rows
        .iter()
        .map(|(_, p, _)| p.to_string().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (status, priority, name) in rows {
        out.push_str(&format!(
            "{status:<status_width$} {priority:>priority_width$} {name}\n"
        ));
    }
    out
}

/// Renders rows as CSV, quoting fields that contain separators or quotes.
#[must_use]
pub fn format_as_csv(rows: &[FeatureRow]) -> String {
    let mut out = String::new();
    for (status, priority, name) in rows {
        out.push_str(&format!(
            "{},{priority},{}\n",
            csv_field(status),
            csv_field(name)
        ));
    }
    out
}

/// Quotes a CSV field when it contains a comma, quote, or newline.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
