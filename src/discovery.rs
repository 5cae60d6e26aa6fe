//! Skill folder discovery.
//!
//! Enumerates the immediate subdirectories of the scan root. A bad root is
//! fatal; a folder without SKILL.md is only a warning and never stops the
//! scan of its siblings.

use anyhow::{bail, Context, Result};
use glob::Pattern;
use std::path::Path;

use crate::findings::{Finding, FindingKind};

/// Outcome of scanning the root directory
#[derive(Debug, Default)]
pub struct Discovery {
    /// Folder names containing a SKILL.md, sorted
    pub candidates: Vec<String>,
    /// Warnings for folders that were examined but yielded no candidate
    pub findings: Vec<Finding>,
    /// Number of folders examined (candidates plus SKILL.md-less folders)
    pub scanned: usize,
}

/// Scan `root` for skill folders.
///
/// Hidden folders and folders matching an exclude pattern are skipped
/// without comment. Plain files in the root are ignored.
pub fn discover(root: &Path, exclude: &[Pattern]) -> Result<Discovery> {
    if !root.exists() {
        bail!("root {} does not exist", root.display());
    }
    if !root.is_dir() {
        bail!("root {} is not a directory", root.display());
    }

    let mut folders = Vec::new();
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("failed to read root {}", root.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read root {}", root.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if exclude.iter().any(|p| p.matches(&name)) {
            continue;
        }
        folders.push(name);
    }
    folders.sort();

    let mut discovery = Discovery {
        scanned: folders.len(),
        ..Discovery::default()
    };
    for name in folders {
        if root.join(&name).join("SKILL.md").is_file() {
            discovery.candidates.push(name);
        } else {
            discovery.findings.push(Finding::new(
                &name,
                FindingKind::MissingSkillFile,
                "folder has no SKILL.md and will not be recognised as a skill",
                &name,
            ));
        }
    }

    Ok(discovery)
}
