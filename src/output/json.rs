//! JSON output formatter.
//!
//! Produces a pretty-printed document with a session summary (counts by
//! severity and category) followed by per-package results. Findings below
//! the minimum-severity floor are omitted from the rendered view only; the
//! in-memory report is untouched.

use crate::finding::{Category, FileError, Finding, ScanReport, ScanResult, Severity};
use std::collections::BTreeMap;

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    timestamp: &'a str,
    min_severity: Option<Severity>,
    summary: Summary,
    packages: Vec<JsonPackage<'a>>,
}

#[derive(serde::Serialize)]
struct Summary {
    packages: usize,
    errored_packages: usize,
    total_findings: usize,
    by_severity: BTreeMap<String, usize>,
    by_category: BTreeMap<String, usize>,
}

#[derive(serde::Serialize)]
struct JsonPackage<'a> {
    package: &'a str,
    path: String,
    severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: &'a Option<String>,
    files_scanned: usize,
    file_errors: &'a [FileError],
    findings: Vec<&'a Finding>,
}

/// Formats a [`ScanReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid
/// data).
pub fn format(report: &ScanReport, min_severity: Option<Severity>) -> String {
    let packages: Vec<JsonPackage<'_>> = report
        .results
        .iter()
        .map(|r| json_package(r, min_severity))
        .collect();

    let sev_counts = report.severity_counts(min_severity);
    let cat_counts = report.category_counts(min_severity);

    let output = JsonReport {
        timestamp: &report.timestamp,
        min_severity,
        summary: Summary {
            packages: report.results.len(),
            errored_packages: report.results.iter().filter(|r| r.error.is_some()).count(),
            total_findings: sev_counts.iter().sum(),
            by_severity: Severity::ALL
                .iter()
                .map(|s| (s.to_string(), sev_counts[*s as usize]))
                .collect(),
            by_category: Category::ALL
                .iter()
                .map(|c| (c.tag().to_string(), cat_counts[*c as usize]))
                .collect(),
        },
        packages,
    };

    let mut rendered =
        serde_json::to_string_pretty(&output).expect("JSON serialization failed");
    rendered.push('\n');
    rendered
}

fn json_package(result: &ScanResult, floor: Option<Severity>) -> JsonPackage<'_> {
    let findings: Vec<&Finding> = result
        .findings
        .iter()
        .filter(|f| f.severity.meets(floor))
        .collect();

    JsonPackage {
        package: &result.package,
        path: result.path.display().to_string(),
        severity: findings.iter().map(|f| f.severity).max(),
        error: &result.error,
        files_scanned: result.files_scanned,
        file_errors: &result.file_errors,
        findings,
    }
}
