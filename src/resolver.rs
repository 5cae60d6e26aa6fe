//! Reference link resolution.
//!
//! Walks the inline Markdown links of a skill body and checks the two
//! directions of the loading contract: every linked `references/` or
//! `rules/` document must exist, and every `references/` document must be
//! linked (an unlinked one is never loaded by an agent).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::findings::{Finding, FindingKind};
use crate::package::SkillPackage;

/// Inline Markdown link: `[text](target)`
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]\(([^()\s]+)\)").expect("link regex"));

/// Resolve all body links of one package.
///
/// Returns broken-link errors first, then orphan warnings, each set sorted
/// by target path. Rule files are loaded by manifest rather than by link,
/// so they are exempt from orphan detection.
pub fn resolve(pkg: &SkillPackage) -> Vec<Finding> {
    let mut linked: BTreeSet<PathBuf> = BTreeSet::new();
    let mut broken: BTreeSet<(String, String)> = BTreeSet::new();

    for target in body_targets(&pkg.body) {
        let path = Path::new(&target);
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
        {
            broken.insert((target, "escapes the skill folder".to_string()));
        } else if path.components().count() != 2 {
            broken.insert((
                target,
                "must sit directly under references/ or rules/".to_string(),
            ));
        } else if pkg.reference_files.contains(path) || pkg.rule_files.contains(path) {
            linked.insert(path.to_path_buf());
        } else {
            broken.insert((target, "does not exist".to_string()));
        }
    }

    let mut findings = Vec::new();
    let skill_md = PathBuf::from(&pkg.folder).join("SKILL.md");
    for (target, reason) in broken {
        findings.push(Finding::new(
            &pkg.folder,
            FindingKind::BrokenReference,
            format!("link target '{}' {}", target, reason),
            &skill_md,
        ));
    }
    for rel in &pkg.reference_files {
        if !linked.contains(rel) {
            findings.push(Finding::new(
                &pkg.folder,
                FindingKind::OrphanReference,
                format!(
                    "'{}' is not linked from SKILL.md and will never be loaded",
                    rel.display()
                ),
                PathBuf::from(&pkg.folder).join(rel),
            ));
        }
    }
    findings
}

/// Extract link targets in scope for resolution: `.md` files addressed
/// through `references/` or `rules/`, with any `#fragment` stripped.
fn body_targets(body: &str) -> Vec<String> {
    LINK_RE
        .captures_iter(body)
        .map(|cap| {
            let target = &cap[1];
            target.split('#').next().unwrap_or(target).to_string()
        })
        .filter(|t| {
            (t.starts_with("references/") || t.starts_with("rules/")) && t.ends_with(".md")
        })
        .collect()
}
