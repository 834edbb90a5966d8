//! Human-readable colored text formatter.
//!
//! Per package: a header, the aggregate severity, then findings grouped by
//! category and ordered by descending severity within each group. A session
//! summary with per-severity and per-category totals closes the report.

use crate::finding::{Category, Finding, ScanReport, ScanResult, Severity};
use colored::Colorize;

/// Formats a [`ScanReport`] as ANSI-colored text, hiding findings below
/// `min_severity`.
pub fn format(report: &ScanReport, min_severity: Option<Severity>) -> String {
    let mut out = String::new();

    for result in &report.results {
        format_package(&mut out, result, min_severity);
    }

    format_summary(&mut out, report, min_severity);
    out
}

fn severity_str(severity: Severity) -> String {
    match severity {
        Severity::Critical => "CRITICAL".red().bold().to_string(),
        Severity::High => "HIGH".red().to_string(),
        Severity::Medium => "MEDIUM".yellow().to_string(),
        Severity::Low => "LOW".blue().to_string(),
    }
}

fn format_package(out: &mut String, result: &ScanResult, floor: Option<Severity>) {
    out.push_str(&format!(
        "\n{}\n",
        format!("  Skill Scan: {}  ", result.package)
            .bold()
            .on_blue()
            .white()
    ));
    out.push_str(&format!("  Path: {}\n\n", result.path.display()));

    if let Some(error) = &result.error {
        out.push_str(&format!(
            "  [{}] {}\n\n",
            "ERROR".red().bold(),
            error
        ));
        return;
    }

    let visible: Vec<&Finding> = result
        .findings
        .iter()
        .filter(|f| f.severity.meets(floor))
        .collect();

    if visible.is_empty() {
        out.push_str(&format!(
            "  {} No known malicious patterns detected ({} files scanned)\n",
            "✓".green(),
            result.files_scanned,
        ));
    } else {
        let overall = visible
            .iter()
            .map(|f| f.severity)
            .max()
            .map(severity_str)
            .unwrap_or_default();
        out.push_str(&format!("  Overall risk: {overall}\n"));
        out.push_str(&format!(
            "  Findings: {}  ({} files scanned)\n\n",
            visible.len(),
            result.files_scanned,
        ));

        for category in Category::ALL {
            let mut group: Vec<&&Finding> =
                visible.iter().filter(|f| f.category == category).collect();
            if group.is_empty() {
                continue;
            }
            // Worst first inside the group; ties fall back to canonical
            // (file, line, pattern id) order.
            group.sort_by(|a, b| {
                b.severity
                    .cmp(&a.severity)
                    .then(a.file.cmp(&b.file))
                    .then(a.line.cmp(&b.line))
                    .then(a.pattern_id.cmp(&b.pattern_id))
            });

            out.push_str(&format!("  {}\n", category.label().bold().underline()));
            for finding in group {
                out.push_str(&format!(
                    "    [{sev}] {id:<4} {location}\n",
                    sev = severity_str(finding.severity),
                    id = finding.pattern_id,
                    location =
                        format!("{}:{}", finding.file.display(), finding.line).dimmed(),
                ));
                out.push_str(&format!("          > {}\n", finding.excerpt.dimmed()));
            }
            out.push('\n');
        }
    }

    if !result.file_errors.is_empty() {
        out.push_str(&format!(
            "  {} ({})\n",
            "Unreadable files".bold(),
            result.file_errors.len()
        ));
        for err in &result.file_errors {
            out.push_str(&format!(
                "    [{}] {} - {}\n",
                "SKIP".dimmed(),
                err.file.display(),
                err.message.dimmed(),
            ));
        }
        out.push('\n');
    }
}

fn format_summary(out: &mut String, report: &ScanReport, floor: Option<Severity>) {
    let separator = "─".repeat(54);
    out.push_str(&format!("{}\n", separator.dimmed()));
    out.push_str(&format!("{}\n", "  Scan Summary".bold().underline()));

    let errored = report.results.iter().filter(|r| r.error.is_some()).count();
    let sev_counts = report.severity_counts(floor);
    let cat_counts = report.category_counts(floor);
    let total: usize = sev_counts.iter().sum();

    out.push_str(&format!(
        "  Packages: {}  Findings: {}  Errors: {}\n",
        report.results.len(),
        total,
        errored,
    ));

    // Worst severity first.
    let by_severity = Severity::ALL
        .iter()
        .rev()
        .map(|s| format!("{} {}", sev_counts[*s as usize], severity_str(*s)))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&format!("  By severity: {by_severity}\n"));

    let by_category = Category::ALL
        .iter()
        .map(|c| format!("{} {}", cat_counts[*c as usize], c.label()))
        .collect::<Vec<_>>()
        .join("  ·  ");
    out.push_str(&format!("  By category: {by_category}\n"));

    if sev_counts[Severity::High as usize] + sev_counts[Severity::Critical as usize] > 0 {
        out.push_str(&format!(
            "  {}\n",
            "⚠ High-risk findings present, review immediately".red().bold()
        ));
    } else if total == 0 && errored == 0 {
        out.push_str(&format!("  {}\n", "✓ No findings".green()));
    }
}
