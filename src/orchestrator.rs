//! Scan orchestration: single-path, auto, and ephemeral pre-scan modes.
//!
//! The orchestrator drives one or many [`scanner`](crate::scanner) runs,
//! emits [`ScanEvent`]s synchronously to a caller-supplied [`ProgressSink`],
//! and assembles the final [`ScanReport`]. Auto mode scans packages in
//! parallel via [rayon]; event delivery is serialized so a single listener
//! never sees interleaved events, and per-package failures become errored
//! report entries rather than aborting the run.

use crate::config::Config;
use crate::error::ScanError;
use crate::finding::{Finding, ScanReport, ScanResult, Severity};
use crate::patterns::Pattern;
use crate::scanner;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

/// A transient progress notification. Handed to the listener by value;
/// events do not outlive the callback.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    PackageStarted {
        package: String,
        /// 1-based position within the scan session.
        index: usize,
        total: usize,
    },
    FindingReported {
        package: String,
        finding: Finding,
    },
    PackageFinished {
        package: String,
        findings: usize,
        severity: Option<Severity>,
    },
    PackageFailed {
        package: String,
        error: String,
    },
    ScanFinished {
        packages: usize,
        findings: usize,
    },
}

/// Receives [`ScanEvent`]s during a scan.
///
/// Implementers must be [`Sync`] because auto mode delivers events from
/// rayon worker threads (one at a time; delivery is serialized). The sink
/// must not block significantly or it stalls the scan.
pub trait ProgressSink: Sync {
    fn on_event(&self, event: ScanEvent);
}

/// A sink that discards every event. For batch callers.
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn on_event(&self, _event: ScanEvent) {}
}

/// Cooperative cancellation for long-running auto scans.
///
/// Checked at package boundaries only: the package in flight finishes, then
/// the run stops. Cloning shares the underlying flag.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Serializes event delivery to a single sink across rayon workers.
struct EventGate<'a> {
    sink: &'a dyn ProgressSink,
    lock: Mutex<()>,
}

impl<'a> EventGate<'a> {
    fn new(sink: &'a dyn ProgressSink) -> Self {
        EventGate {
            sink,
            lock: Mutex::new(()),
        }
    }

    fn emit(&self, event: ScanEvent) {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.sink.on_event(event);
    }
}

/// Scans a single package directory.
///
/// A bad path is fatal here (unlike auto mode, where it becomes an errored
/// report entry): the sole target of the scan could not be resolved.
pub fn scan_path(
    path: &Path,
    patterns: &[Pattern],
    config: &Config,
    sink: &dyn ProgressSink,
) -> Result<ScanReport, ScanError> {
    let package = scanner::package_name(path);
    sink.on_event(ScanEvent::PackageStarted {
        package: package.clone(),
        index: 1,
        total: 1,
    });

    let result = match scanner::scan_package(path, patterns, config) {
        Ok(r) => r,
        Err(e) => {
            sink.on_event(ScanEvent::PackageFailed {
                package,
                error: e.to_string(),
            });
            return Err(e);
        }
    };

    emit_package_events(sink, &result);
    sink.on_event(ScanEvent::ScanFinished {
        packages: 1,
        findings: result.findings.len(),
    });
    Ok(ScanReport::new(vec![result]))
}

/// Scans every package in `paths`, continuing past individual failures.
///
/// Packages are scanned in parallel; the assembled report is sorted by
/// package path, so its order never depends on scheduling. A package whose
/// scan fails appears as an errored entry. When `cancel` trips, packages
/// not yet started are left out of the report.
pub fn scan_all(
    paths: &[PathBuf],
    patterns: &[Pattern],
    config: &Config,
    sink: &dyn ProgressSink,
    cancel: &CancelToken,
) -> ScanReport {
    let total = paths.len();
    let gate = EventGate::new(sink);

    let mut results: Vec<ScanResult> = paths
        .par_iter()
        .enumerate()
        .filter_map(|(i, path)| {
            if cancel.is_cancelled() {
                return None;
            }
            let package = scanner::package_name(path);
            gate.emit(ScanEvent::PackageStarted {
                package: package.clone(),
                index: i + 1,
                total,
            });

            match scanner::scan_package(path, patterns, config) {
                Ok(result) => {
                    for finding in &result.findings {
                        gate.emit(ScanEvent::FindingReported {
                            package: package.clone(),
                            finding: finding.clone(),
                        });
                    }
                    gate.emit(ScanEvent::PackageFinished {
                        package,
                        findings: result.findings.len(),
                        severity: result.max_severity(),
                    });
                    Some(result)
                }
                Err(e) => {
                    gate.emit(ScanEvent::PackageFailed {
                        package: package.clone(),
                        error: e.to_string(),
                    });
                    Some(ScanResult::errored(&package, path, e.to_string()))
                }
            }
        })
        .collect();

    results.sort_by(|a, b| a.path.cmp(&b.path));

    gate.emit(ScanEvent::ScanFinished {
        packages: results.len(),
        findings: results.iter().map(|r| r.findings.len()).sum(),
    });
    ScanReport::new(results)
}

/// Downloads a not-yet-installed package into a fresh temporary directory,
/// scans it, and removes the directory on every exit path.
///
/// The `download` collaborator must materialize the package files under the
/// directory it is given, or fail cleanly with a message. The temporary
/// directory is owned by [`tempfile::TempDir`], so the recursive delete
/// runs whether the download fails, the scan errors, or everything
/// succeeds.
pub fn pre_scan<F>(
    package: &str,
    download: F,
    patterns: &[Pattern],
    config: &Config,
    sink: &dyn ProgressSink,
) -> Result<ScanReport, ScanError>
where
    F: FnOnce(&Path) -> Result<(), String>,
{
    let tmp = tempfile::Builder::new()
        .prefix("skillscan-")
        .tempdir()
        .map_err(|e| ScanError::DownloadFailed(format!("could not create temp dir: {e}")))?;

    download(tmp.path()).map_err(ScanError::DownloadFailed)?;

    sink.on_event(ScanEvent::PackageStarted {
        package: package.to_string(),
        index: 1,
        total: 1,
    });

    let root = locate_skill_root(tmp.path());
    let mut result = match scanner::scan_package(&root, patterns, config) {
        Ok(r) => r,
        Err(e) => {
            sink.on_event(ScanEvent::PackageFailed {
                package: package.to_string(),
                error: e.to_string(),
            });
            return Err(e);
        }
    };
    // Report under the package's real name, not the throwaway temp path.
    result.package = package.to_string();
    result.path = PathBuf::from(package);

    emit_package_events(sink, &result);
    sink.on_event(ScanEvent::ScanFinished {
        packages: 1,
        findings: result.findings.len(),
    });
    Ok(ScanReport::new(vec![result]))
}

/// Finds the actual skill root inside a downloaded tree: the directory
/// containing the first `SKILL.md` (archives often unpack into a nested
/// folder), falling back to the download root.
fn locate_skill_root(dir: &Path) -> PathBuf {
    WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name() == "SKILL.md")
        .and_then(|e| e.path().parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| dir.to_path_buf())
}

fn emit_package_events(sink: &dyn ProgressSink, result: &ScanResult) {
    for finding in &result.findings {
        sink.on_event(ScanEvent::FindingReported {
            package: result.package.clone(),
            finding: finding.clone(),
        });
    }
    sink.on_event(ScanEvent::PackageFinished {
        package: result.package.clone(),
        findings: result.findings.len(),
        severity: result.max_severity(),
    });
}
