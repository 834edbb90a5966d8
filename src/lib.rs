//! # skillscan
//!
//! Static malicious-content scanner for AI agent skill packages.
//!
//! `skillscan` inspects a skill directory (the markdown instructions,
//! scripts, and manifests consumed by an AI coding agent) and reports
//! evidence of malicious intent across four attack categories: prompt
//! injection, data exfiltration, privilege escalation, and supply chain
//! tampering. It is a fast, explainable heuristic triage tool: content is
//! never executed, only pattern-matched.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use skillscan::{config::Config, orchestrator::{self, NoopSink}, output, patterns};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let report = orchestrator::scan_path(
//!     Path::new("./my-skill"),
//!     patterns::all(),
//!     &config,
//!     &NoopSink,
//! ).expect("scan failed");
//!
//! let text = output::format_report(&report, None, output::OutputFormat::Text);
//! print!("{text}");
//! ```
//!
//! ## Architecture
//!
//! The crate is organized around a pipeline:
//!
//! 1. **[`patterns`]**: immutable catalog of detection rules (P1–P4,
//!    E1–E5, PE1–PE3, SC1–SC3), each a regex with a category, severity,
//!    and file-type target.
//! 2. **[`walker`]**: deterministic file enumeration with size, binary,
//!    symlink, and hidden-file policy.
//! 3. **[`matcher`]**: applies the library to one file, one finding per
//!    matching line, plus a base64-payload sweep.
//! 4. **[`scanner`]**: scans one package into a
//!    [`finding::ScanResult`] with canonical finding order.
//! 5. **[`orchestrator`]**: single-path, auto (parallel, cancellable),
//!    and ephemeral pre-scan modes, with [`orchestrator::ScanEvent`]
//!    progress delivery.
//! 6. **[`output`]**: renders a [`finding::ScanReport`] as colored text
//!    or JSON, applying a view-only minimum-severity filter.
//!
//! [`discover`] supplies the installed-skill enumerator behind `--auto`,
//! and [`config`] the optional `skillscan.toml` settings.

pub mod config;
pub mod discover;
pub mod error;
pub mod finding;
pub mod matcher;
pub mod orchestrator;
pub mod output;
pub mod patterns;
pub mod scanner;
pub mod walker;
