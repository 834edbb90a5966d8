//! Scan-level error taxonomy.
//!
//! Only errors that abort an operation live here. Per-file read failures are
//! data, not errors: they are recorded as
//! [`FileError`](crate::finding::FileError) entries inside the
//! [`ScanResult`](crate::finding::ScanResult) and the scan continues.

use std::path::PathBuf;

/// Errors that can abort a scan, a pre-scan, or report output.
///
/// Propagation policy:
/// - For a single-path scan, [`PathNotFound`](ScanError::PathNotFound) and
///   [`NotADirectory`](ScanError::NotADirectory) are fatal.
/// - In auto mode the orchestrator converts per-package errors into errored
///   [`ScanResult`](crate::finding::ScanResult) entries and keeps going.
/// - [`DownloadFailed`](ScanError::DownloadFailed) aborts only the pre-scan
///   invocation that raised it; the temporary directory is still removed.
/// - [`Write`](ScanError::Write) surfaces a failed report write to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl ScanError {
    /// Short machine-readable tag for the error kind, used when an error is
    /// embedded in a report entry.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::PathNotFound(_) => "PathNotFound",
            ScanError::NotADirectory(_) => "NotADirectory",
            ScanError::DownloadFailed(_) => "DownloadFailed",
            ScanError::Write { .. } => "WriteError",
            ScanError::Config(_) => "ConfigError",
        }
    }
}
