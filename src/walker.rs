//! File enumeration for a package directory.
//!
//! The walker applies the scanner's inclusion policy: symlinks are never
//! followed (the walk can therefore never escape the package root), hidden
//! files and directories are ignored, oversized files and binary files are
//! recorded as skipped rather than scanned, and a read failure on one file
//! never aborts the walk.
//!
//! Enumeration order is sorted by file name at every directory level, so
//! re-walking an unchanged tree yields the same sequence.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default ceiling for scannable file size: 1 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Number of leading bytes sampled for the binary heuristic.
const BINARY_SNIFF_LEN: usize = 8192;

/// Coarse file classification driving pattern applicability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Markdown,
    Code,
    Requirements,
    Other,
}

const CODE_EXTENSIONS: &[&str] = &["py", "sh", "bash", "js", "ts", "mjs", "cjs"];
const REQUIREMENTS_FILES: &[&str] = &["requirements.txt", "requirements.in", "Pipfile"];

/// Classifies a file by name and extension.
pub fn classify(path: &Path) -> FileKind {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if REQUIREMENTS_FILES.contains(&name) {
            return FileKind::Requirements;
        }
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("md") => FileKind::Markdown,
        Some(ext) if CODE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) => FileKind::Code,
        _ => FileKind::Other,
    }
}

/// Why a file was excluded from matching without being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Larger than the configured size ceiling.
    TooLarge,
    /// NUL byte found in the leading sample.
    Binary,
}

/// Outcome of reading one walked file.
#[derive(Debug)]
pub enum FileContent {
    Text(String),
    Skipped(SkipReason),
    Error(String),
}

/// One entry in the walk: relative path, classification, and content.
#[derive(Debug)]
pub struct WalkedFile {
    /// Path relative to the package root.
    pub path: PathBuf,
    pub kind: FileKind,
    pub content: FileContent,
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Enumerates scannable files under `root`.
///
/// Returns a finite sequence sorted by relative path. Read errors are
/// embedded per entry as [`FileContent::Error`]; the walk itself never
/// fails once `root` exists.
pub fn walk(root: &Path, max_file_size: u64) -> Vec<WalkedFile> {
    let mut files = Vec::new();

    let entries = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        // Prune hidden files and whole hidden subtrees, but never the root
        // itself (a package may legitimately live under a dot-directory).
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                // A directory we cannot descend into is a per-file error,
                // not a walk failure.
                let path = err
                    .path()
                    .map(|p| relative_to(p, root))
                    .unwrap_or_default();
                files.push(WalkedFile {
                    kind: classify(&path),
                    content: FileContent::Error(err.to_string()),
                    path,
                });
                continue;
            }
        };

        if entry.path_is_symlink() || !entry.file_type().is_file() {
            continue;
        }

        let rel = relative_to(entry.path(), root);
        let kind = classify(&rel);

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                files.push(WalkedFile {
                    path: rel,
                    kind,
                    content: FileContent::Error(err.to_string()),
                });
                continue;
            }
        };

        if metadata.len() > max_file_size {
            files.push(WalkedFile {
                path: rel,
                kind,
                content: FileContent::Skipped(SkipReason::TooLarge),
            });
            continue;
        }

        let content = match std::fs::read(entry.path()) {
            Ok(bytes) => {
                let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
                if sniff.contains(&0) {
                    FileContent::Skipped(SkipReason::Binary)
                } else {
                    FileContent::Text(String::from_utf8_lossy(&bytes).into_owned())
                }
            }
            Err(err) => FileContent::Error(err.to_string()),
        };

        files.push(WalkedFile {
            path: rel,
            kind,
            content,
        });
    }

    files
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
