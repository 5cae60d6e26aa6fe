//! Skill package model and folder loading.
//!
//! A `SkillPackage` is the parsed, immutable view of one skill folder:
//! frontmatter fields, the Markdown body, and the enumerated files under
//! `references/` and `rules/`. Construction performs all of the folder's
//! I/O up front so the validator and resolver stay purely functional.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::findings::Finding;
use crate::frontmatter::{self, Impact};

/// One parsed rule file from a skill's rules/ folder
#[derive(Debug, Clone)]
pub struct Rule {
    pub title: String,
    pub impact: Impact,
    pub tags: Vec<String>,
    /// Path relative to the skill folder, e.g. `rules/queries-indexes.md`
    pub path: PathBuf,
}

/// Line count and TOC presence for one reference document
#[derive(Debug, Clone)]
pub struct ReferenceDoc {
    /// Path relative to the skill folder, e.g. `references/patterns.md`
    pub path: PathBuf,
    pub line_count: usize,
    pub has_toc_heading: bool,
}

/// Immutable model of one skill folder
#[derive(Debug, Clone)]
pub struct SkillPackage {
    /// Basename of the containing folder
    pub folder: String,
    /// `name` field from frontmatter
    pub name: String,
    /// `description` field from frontmatter
    pub description: String,
    /// Markdown below the frontmatter block, trimmed
    pub body: String,
    pub body_line_count: usize,
    /// All `references/*.md` paths, relative to the skill folder, sorted
    pub reference_files: BTreeSet<PathBuf>,
    /// All `rules/*.md` paths, relative to the skill folder, sorted
    pub rule_files: BTreeSet<PathBuf>,
    /// Per-reference stats for the TOC check
    pub reference_docs: Vec<ReferenceDoc>,
    /// Rules whose frontmatter parsed cleanly
    pub rules: Vec<Rule>,
    /// Absolute path of the skill folder
    pub dir: PathBuf,
}

/// Result of loading one skill folder: the package when SKILL.md parsed,
/// plus any findings produced along the way (rule-file errors survive even
/// when the package itself loads fine).
#[derive(Debug)]
pub struct LoadedSkill {
    pub package: Option<SkillPackage>,
    pub findings: Vec<Finding>,
}

/// Load and parse one skill folder under `root`.
///
/// Per-skill structural problems become findings; only filesystem failures
/// (a file that exists but cannot be read) propagate as fatal errors.
pub fn load_skill(root: &Path, folder: &str) -> Result<LoadedSkill> {
    let dir = root.join(folder);
    let skill_md = dir.join("SKILL.md");
    let skill_md_rel = PathBuf::from(folder).join("SKILL.md");
    let mut findings = Vec::new();

    let content = std::fs::read_to_string(&skill_md)
        .with_context(|| format!("failed to read {}", skill_md.display()))?;

    let (yaml, body) = match frontmatter::split(&content) {
        Ok(parts) => parts,
        Err(e) => {
            findings.push(Finding::new(folder, e.kind(), e.to_string(), &skill_md_rel));
            return Ok(LoadedSkill {
                package: None,
                findings,
            });
        }
    };
    let fm = match frontmatter::parse_skill(&yaml) {
        Ok(fm) => fm,
        Err(e) => {
            findings.push(Finding::new(folder, e.kind(), e.to_string(), &skill_md_rel));
            return Ok(LoadedSkill {
                package: None,
                findings,
            });
        }
    };

    let body = body.trim().to_string();
    let body_line_count = body.lines().count();

    let reference_files = list_md_files(&dir, "references")?;
    let rule_files = list_md_files(&dir, "rules")?;

    let mut reference_docs = Vec::new();
    for rel in &reference_files {
        let content = std::fs::read_to_string(dir.join(rel))
            .with_context(|| format!("failed to read {}", dir.join(rel).display()))?;
        reference_docs.push(ReferenceDoc {
            path: rel.clone(),
            line_count: content.lines().count(),
            has_toc_heading: has_toc_heading(&content),
        });
    }

    let mut rules = Vec::new();
    for rel in &rule_files {
        // Leading-underscore files (`_sections.md` manifest, `_template.md`)
        // are infrastructure, not rules
        if is_underscore_file(rel) {
            continue;
        }
        let rule_path = dir.join(rel);
        let content = std::fs::read_to_string(&rule_path)
            .with_context(|| format!("failed to read {}", rule_path.display()))?;
        let rel_from_root = PathBuf::from(folder).join(rel);
        match frontmatter::split(&content).and_then(|(yaml, _)| frontmatter::parse_rule(&yaml)) {
            Ok(fm) => rules.push(Rule {
                title: fm.title,
                impact: fm.impact,
                tags: fm.tags,
                path: rel.clone(),
            }),
            Err(e) => {
                findings.push(Finding::new(folder, e.kind(), e.to_string(), rel_from_root));
            }
        }
    }

    Ok(LoadedSkill {
        package: Some(SkillPackage {
            folder: folder.to_string(),
            name: fm.name,
            description: fm.description,
            body,
            body_line_count,
            reference_files,
            rule_files,
            reference_docs,
            rules,
            dir,
        }),
        findings,
    })
}

/// Enumerate `<sub>/*.md` one level deep, sorted, relative to the skill folder
fn list_md_files(dir: &Path, sub: &str) -> Result<BTreeSet<PathBuf>> {
    let target = dir.join(sub);
    let mut files = BTreeSet::new();
    if !target.is_dir() {
        return Ok(files);
    }
    for entry in WalkDir::new(&target)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("failed to scan {}", target.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".md") {
            files.insert(PathBuf::from(sub).join(name.as_ref()));
        }
    }
    Ok(files)
}

fn is_underscore_file(rel: &Path) -> bool {
    rel.file_name()
        .map(|n| n.to_string_lossy().starts_with('_'))
        .unwrap_or(false)
}

/// A table-of-contents heading is any Markdown heading mentioning "contents"
fn has_toc_heading(content: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim_start();
        line.starts_with('#') && line.to_ascii_lowercase().contains("contents")
    })
}
