//! Core data model: categories, severities, findings, and reports.

use std::fmt;
use std::path::PathBuf;

/// Attack category recognized by the scanner. Fixed, closed set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    PromptInjection,
    DataExfiltration,
    PrivilegeEscalation,
    SupplyChain,
}

impl Category {
    /// All categories, in canonical display order.
    pub const ALL: [Category; 4] = [
        Category::PromptInjection,
        Category::DataExfiltration,
        Category::PrivilegeEscalation,
        Category::SupplyChain,
    ];

    /// Machine-readable tag matching the serialized form.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::PromptInjection => "PROMPT_INJECTION",
            Category::DataExfiltration => "DATA_EXFILTRATION",
            Category::PrivilegeEscalation => "PRIVILEGE_ESCALATION",
            Category::SupplyChain => "SUPPLY_CHAIN",
        }
    }

    /// Human-readable label for text reports.
    pub fn label(&self) -> &'static str {
        match self {
            Category::PromptInjection => "Prompt Injection",
            Category::DataExfiltration => "Data Exfiltration",
            Category::PrivilegeEscalation => "Privilege Escalation",
            Category::SupplyChain => "Supply Chain",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered risk rating: `Low < Medium < High < Critical`.
///
/// Used both as a per-finding rating and as a reporting/exit-status floor.
/// "Clean" (no findings) is represented as `Option<Severity>::None`, which
/// sorts below `Some(Low)`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, ascending.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Returns `true` when this severity is at or above the optional floor.
    /// `None` means no floor: everything passes.
    pub fn meets(self, floor: Option<Severity>) -> bool {
        floor.map_or(true, |f| self >= f)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One concrete match of a detection pattern against package content.
///
/// Immutable once produced. `file` is relative to the package root.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    pub pattern_id: String,
    pub category: Category,
    pub severity: Severity,
    pub file: PathBuf,
    /// 1-based line number of the matching line.
    pub line: usize,
    /// Trimmed excerpt of the matching line, truncated to ~120 characters.
    pub excerpt: String,
}

/// A non-fatal read failure for a single file inside a package.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileError {
    pub file: PathBuf,
    pub message: String,
}

/// The outcome of scanning one package. Never mutated after completion.
///
/// Findings are kept in canonical order: by file path, then line number,
/// then pattern id, never by filesystem enumeration order.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScanResult {
    /// Package name (last path component).
    pub package: String,
    /// Package directory that was scanned.
    pub path: PathBuf,
    pub findings: Vec<Finding>,
    /// Per-file read errors encountered during the walk.
    pub file_errors: Vec<FileError>,
    /// Number of files whose content was actually matched against the
    /// pattern library (size/binary-skipped files are excluded).
    pub files_scanned: usize,
    /// Set when the package could not be scanned at all (auto mode records
    /// the failure here instead of aborting the run).
    pub error: Option<String>,
}

impl ScanResult {
    /// An entry for a package that could not be scanned.
    pub fn errored(package: &str, path: &std::path::Path, error: String) -> Self {
        ScanResult {
            package: package.to_string(),
            path: path.to_path_buf(),
            findings: vec![],
            file_errors: vec![],
            files_scanned: 0,
            error: Some(error),
        }
    }

    /// Aggregate severity: the maximum among all findings, or `None` when
    /// the package is clean.
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    /// Returns `true` when the scan completed with no findings and no errors.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.file_errors.is_empty() && self.error.is_none()
    }

    /// Distinct categories present among the findings, in canonical order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| self.findings.iter().any(|f| f.category == *c))
            .collect()
    }

    /// Sorts findings into canonical order (file, line, pattern id).
    pub fn sort_findings(&mut self) {
        self.findings.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.line.cmp(&b.line))
                .then(a.pattern_id.cmp(&b.pattern_id))
        });
    }
}

/// The outcome of one scan session covering one or more packages.
///
/// Built once per orchestrator invocation and immutable thereafter. Severity
/// filtering never touches this structure; it is applied at render time
/// only.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ScanReport {
    /// RFC 3339 timestamp of when the report was assembled.
    pub timestamp: String,
    pub results: Vec<ScanResult>,
}

impl ScanReport {
    pub fn new(results: Vec<ScanResult>) -> Self {
        ScanReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            results,
        }
    }

    /// Every finding across all packages, in report order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.results.iter().flat_map(|r| r.findings.iter())
    }

    /// Maximum severity across all packages, or `None` when every package
    /// is clean.
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings().map(|f| f.severity).max()
    }

    /// Returns `true` when any package carries a scan-level error entry.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.error.is_some())
    }

    /// Finding counts per severity (ascending order), honoring the floor.
    pub fn severity_counts(&self, floor: Option<Severity>) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for f in self.findings().filter(|f| f.severity.meets(floor)) {
            counts[f.severity as usize] += 1;
        }
        counts
    }

    /// Finding counts per category (canonical order), honoring the floor.
    pub fn category_counts(&self, floor: Option<Severity>) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for f in self.findings().filter(|f| f.severity.meets(floor)) {
            counts[f.category as usize] += 1;
        }
        counts
    }
}
