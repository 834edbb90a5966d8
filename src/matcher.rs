//! Applies the pattern library to one file's content.
//!
//! Matching is line-oriented: every line that matches an applicable pattern
//! yields one finding, so a pattern can fire many times in one file. The
//! matcher does not deduplicate overlapping matches from different patterns;
//! aggregation happens downstream in the scanner.
//!
//! In addition to the regex rules, a base64 sweep decodes long base64 runs
//! and flags payloads whose plaintext contains a known-dangerous token.

use crate::finding::{Category, Finding, Severity};
use crate::patterns::Pattern;
use crate::walker::{FileContent, WalkedFile};
use base64::Engine;
use regex::Regex;
use std::sync::LazyLock;

/// Matches every applicable pattern against the file and returns the
/// resulting findings, in (line, catalog) order.
///
/// Skipped and errored files produce no findings.
pub fn match_file(file: &WalkedFile, patterns: &[Pattern]) -> Vec<Finding> {
    let content = match &file.content {
        FileContent::Text(c) => c,
        _ => return vec![],
    };

    let applicable: Vec<&Pattern> = patterns
        .iter()
        .filter(|p| p.target.applies(file.kind))
        .collect();

    let mut findings = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        for pattern in &applicable {
            if pattern.regex.is_match(line) {
                findings.push(Finding {
                    pattern_id: pattern.id.to_string(),
                    category: pattern.category,
                    severity: pattern.severity,
                    file: file.path.clone(),
                    line: line_idx + 1,
                    excerpt: excerpt(line),
                });
            }
        }
    }

    if let Some(f) = check_base64_payload(content, file) {
        findings.push(f);
    }

    findings
}

/// Trims a line and truncates it to ~120 characters at a char boundary.
///
/// Raw byte slicing would panic on multi-byte UTF-8 sequences.
fn excerpt(line: &str) -> String {
    let line = line.trim();
    if line.len() > 120 {
        let cut = line
            .char_indices()
            .nth(117)
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        format!("{}...", &line[..cut])
    } else {
        line.to_string()
    }
}

static RE_BASE64_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9+/]{40,}={0,2}").unwrap());

/// Tokens that mark a decoded base64 payload as suspicious.
const SUSPICIOUS_DECODED: &[&str] = &[
    "exec",
    "eval",
    "import os",
    "subprocess",
    "curl",
    "wget",
    "requests.post",
    "/etc/passwd",
    ".ssh/",
];

/// Decodes long base64 runs and reports the first one whose plaintext
/// contains a dangerous token. At most one finding per file.
fn check_base64_payload(content: &str, file: &WalkedFile) -> Option<Finding> {
    for m in RE_BASE64_RUN.find_iter(content) {
        let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(m.as_str()) else {
            continue;
        };
        let decoded = String::from_utf8_lossy(&bytes);
        for token in SUSPICIOUS_DECODED {
            if decoded.contains(token) {
                let line = content[..m.start()].matches('\n').count() + 1;
                let preview: String = decoded.chars().take(80).collect();
                return Some(Finding {
                    pattern_id: "SC3".to_string(),
                    category: Category::SupplyChain,
                    severity: Severity::High,
                    file: file.path.clone(),
                    line,
                    excerpt: format!("base64 payload decodes to '{token}': {preview}"),
                });
            }
        }
    }
    None
}
