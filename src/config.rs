//! Configuration loading.
//!
//! The default configuration file is `skillscan.toml` in the current
//! working directory. Every field carries a default, so the file can be
//! omitted entirely.
//!
//! ```toml
//! [limits]
//! max-file-size = 1048576   # bytes; walker size ceiling
//!
//! [policy]
//! fail-on = "HIGH"          # exit-status severity threshold
//! ```

use crate::error::ScanError;
use crate::finding::Severity;
use crate::walker::DEFAULT_MAX_FILE_SIZE;
use std::path::Path;

/// Main configuration for the scanner.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    pub limits: LimitsConfig,
    pub policy: PolicyConfig,
}

/// Resource limits applied during the file walk.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LimitsConfig {
    /// Files above this size (bytes) are skipped, not scanned.
    pub max_file_size: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Exit-status policy.
///
/// The scanner reports every finding by default but exits nonzero only when
/// a finding reaches `fail_on`. The default threshold is
/// [`Severity::High`]; override it here or with `--fail-on`.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PolicyConfig {
    pub fail_on: Severity,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            fail_on: Severity::High,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. Otherwise try `skillscan.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// [`ScanError::Config`] when the explicit path is missing, the file
    /// cannot be read, or the TOML fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, ScanError> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ScanError::Config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => {
                let default_path = Path::new("skillscan.toml");
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    ScanError::Config(format!("failed to read {}: {e}", path.display()))
                })?;
                toml::from_str(&content).map_err(|e| {
                    ScanError::Config(format!("failed to parse {}: {e}", path.display()))
                })
            }
            None => Ok(Config::default()),
        }
    }
}
