//! Terminal output helpers shared by all commands.
//!
//! Errors and warnings go to stderr, results to stdout, so that scripted callers
//! can capture listings without the decorations.

use colored::*;

/// Prints `✕ <message>` in red to stderr
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✕".red(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "!".yellow(), message);
}

/// Prints `✓ <message>` with a green check mark
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_info(message: &str) {
    println!("{message}");
}

pub fn print_section_header(header: &str) {
    println!("{}:", header.bold());
}

/// `1 file` / `3 files`
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
