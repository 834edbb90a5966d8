//! Scans one package directory end-to-end.

use crate::config::Config;
use crate::error::ScanError;
use crate::finding::{FileError, ScanResult};
use crate::matcher;
use crate::patterns::Pattern;
use crate::walker::{self, FileContent};
use std::path::Path;

/// Scans a single package directory and returns its [`ScanResult`].
///
/// Walks every scannable file, matches each against the pattern library,
/// and accumulates findings in canonical order (file path, then line, then
/// pattern id). A package with zero scannable files yields an empty, clean
/// result, not an error.
///
/// # Errors
///
/// [`ScanError::PathNotFound`] when `path` does not exist, and
/// [`ScanError::NotADirectory`] when it is not a directory. Per-file read
/// failures are recorded in [`ScanResult::file_errors`] instead.
pub fn scan_package(
    path: &Path,
    patterns: &[Pattern],
    config: &Config,
) -> Result<ScanResult, ScanError> {
    if !path.exists() {
        return Err(ScanError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }

    let files = walker::walk(path, config.limits.max_file_size);

    let mut findings = Vec::new();
    let mut file_errors = Vec::new();
    let mut files_scanned = 0usize;

    for file in &files {
        match &file.content {
            FileContent::Text(_) => {
                files_scanned += 1;
                findings.extend(matcher::match_file(file, patterns));
            }
            FileContent::Skipped(_) => {}
            FileContent::Error(message) => file_errors.push(FileError {
                file: file.path.clone(),
                message: message.clone(),
            }),
        }
    }

    let mut result = ScanResult {
        package: package_name(path),
        path: path.to_path_buf(),
        findings,
        file_errors,
        files_scanned,
        error: None,
    };
    result.sort_findings();
    Ok(result)
}

/// Extracts the package name from a directory path.
///
/// Returns the last path component or `"unknown"` when the path has no
/// file-name segment (e.g., `/`).
pub fn package_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
