//! CLI command implementations.
//!
//! Each command takes the [`ModmanContext`](crate::ModmanContext), calls the
//! library for structured results and formats them. Commands that cannot do
//! what was asked return an error so the binary exits non-zero.

pub mod check_migrations;
pub mod config;
pub mod dependencies;
pub mod detect_updates;
pub mod diff;
pub mod status;
pub mod toggle;
pub mod track;
pub mod versions;

use colored::Colorize;

/// Width of the label column in two-column output.
const DETAIL_WIDTH: usize = 20;

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// `label ........ value` style line.
pub fn print_detail(label: &str, value: &str) {
    println!("  {} {value}", format!("{label:<DETAIL_WIDTH$}").bright_blue());
}

/// Indented list entry with a coloured marker.
pub fn print_item(marker: &colored::ColoredString, text: &str) {
    println!("    {marker} {text}");
}

/// Suggested follow-up command.
pub fn print_hint(command: &str) {
    println!("    {}", command.green());
}
