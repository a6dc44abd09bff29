//! Color mapping for change kinds.
//!
//! One place decides how each [`ChangeKind`] is colored so the status listing and
//! the command summaries agree.

use crate::core::status::{ChangeKind, ChangeRecord};
use colored::*;

/// Apply the color for `kind` to `text`
pub fn paint(kind: ChangeKind, text: &str) -> ColoredString {
    match kind {
        ChangeKind::Modified => text.yellow(),
        ChangeKind::Added => text.green(),
        ChangeKind::Removed => text.red(),
        ChangeKind::Missing => text.red().bold(),
        ChangeKind::Renamed | ChangeKind::Copied => text.blue(),
        ChangeKind::ChangedMode => text.magenta(),
        ChangeKind::Untracked => text.cyan(),
        ChangeKind::Unmerged => text.red().bold(),
        ChangeKind::Ignored => text.bright_black(),
    }
}

/// Marker padded to a fixed width so paths line up
pub fn aligned_marker(kind: ChangeKind) -> ColoredString {
    paint(kind, &format!("{:<2}", kind.as_str()))
}

/// One listing line: marker, path (with rename source), description
pub fn format_record(record: &ChangeRecord) -> String {
    let path = match &record.previous_path {
        Some(previous) => format!("{previous} -> {}", record.path),
        None => record.path.clone(),
    };
    let staged = if record.staged { ", staged" } else { "" };
    format!(
        "{} {} {}",
        aligned_marker(record.kind),
        paint(record.kind, &path),
        format!("({}{staged})", record.kind.description()).bright_black()
    )
}
