//! Report rendering.
//!
//! Two styles are supported:
//!
//! | Style | Module | Use case |
//! |-------|--------|----------|
//! | [`Text`](OutputFormat::Text) | [`text`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json) | [`json`] | Automation / scripting  |
//!
//! Rendering is pure: the same report and parameters always produce the
//! same output. The minimum-severity floor filters only what is rendered;
//! the underlying [`ScanReport`] keeps every finding.

pub mod json;
pub mod text;

use crate::error::ScanError;
use crate::finding::{ScanReport, Severity};
use std::path::Path;

/// Supported rendering styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable colored text, grouped by package then category.
    Text,
    /// Machine-readable JSON with summary counts.
    Json,
}

/// Renders a [`ScanReport`] in the requested style.
///
/// `min_severity` hides findings below the floor from the rendered view;
/// `None` renders everything.
pub fn format_report(
    report: &ScanReport,
    min_severity: Option<Severity>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => text::format(report, min_severity),
        OutputFormat::Json => json::format(report, min_severity),
    }
}

/// Writes rendered output to a file.
///
/// # Errors
///
/// [`ScanError::Write`] when the file cannot be written; the failure is
/// surfaced to the caller, never swallowed.
pub fn write_report(rendered: &str, path: &Path) -> Result<(), ScanError> {
    std::fs::write(path, rendered).map_err(|source| ScanError::Write {
        path: path.to_path_buf(),
        source,
    })
}
