use clap::Parser;
use skillscan::finding::Severity;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skillscan",
    version,
    about = "Static malicious-content scanner for AI agent skill packages"
)]
pub struct Cli {
    /// Path to a skill package directory
    #[arg(value_name = "PATH", required_unless_present = "auto")]
    pub path: Option<PathBuf>,

    /// Scan every installed agent skill discovered on this machine
    #[arg(long, short = 'a')]
    pub auto: bool,

    /// Project root to include project-level skills in --auto discovery
    #[arg(long, short = 'p', requires = "auto", value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Only report findings at or above this severity
    #[arg(long, value_enum, ignore_case = true, value_name = "SEVERITY")]
    pub min_severity: Option<Severity>,

    /// Exit nonzero when a finding at or above this severity is present
    /// (default: HIGH, or the value from skillscan.toml)
    #[arg(long, value_enum, ignore_case = true, value_name = "SEVERITY")]
    pub fail_on: Option<Severity>,

    /// Emit machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Custom config file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
