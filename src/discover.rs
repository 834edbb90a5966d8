//! Installed-skill discovery.
//!
//! Enumerates the well-known skill directories of AI coding agents, both
//! global (under the home directory) and project-level. A skill is an
//! immediate child directory containing a `SKILL.md` file. This is the
//! default installed-package enumerator backing `--auto`.

use std::path::{Path, PathBuf};

/// Global skill roots, relative to the home directory.
const GLOBAL_SKILL_ROOTS: &[&str] = &[
    ".claude/skills",
    ".kiro/skills",
    ".codex/skills",
    ".gemini/skills",
    ".gemini/antigravity/skills",
    ".config/opencode/skill",
    ".agents/skills",
];

/// Project-level skill roots, relative to a project directory.
const PROJECT_SKILL_ROOTS: &[&str] = &[
    ".claude/skills",
    ".kiro/skills",
    ".codex/skills",
    ".gemini/skills",
    ".github/skills",
    ".cursor/skills",
    ".opencode/skills",
    ".opencode/skill",
    ".agents/skills",
];

/// Returns every installed skill directory found on this machine, sorted
/// and deduplicated.
///
/// Scans the global roots under the home directory, plus the project-level
/// roots under `project_root` when given. Missing roots are silently
/// skipped.
pub fn installed_skills(project_root: Option<&Path>) -> Vec<PathBuf> {
    let mut found = Vec::new();

    if let Some(home) = dirs::home_dir() {
        for root in GLOBAL_SKILL_ROOTS {
            found.extend(skills_under(&home.join(root)));
        }
    }

    if let Some(project) = project_root {
        for root in PROJECT_SKILL_ROOTS {
            found.extend(skills_under(&project.join(root)));
        }
    }

    found.sort();
    found.dedup();
    found
}

/// Returns immediate child directories of `root` that contain a `SKILL.md`
/// file, sorted alphabetically by directory name.
pub fn skills_under(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return vec![];
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| p.join("SKILL.md").exists())
        .collect();

    dirs.sort();
    dirs
}
