//! Structural checks over a parsed skill package.
//!
//! Validation is purely functional: all filesystem work happened at load
//! time, so the same package and limits always yield the same ordered
//! findings.

use std::path::PathBuf;

use crate::config::Limits;
use crate::findings::{Finding, FindingKind};
use crate::package::SkillPackage;

/// Apply all structural checks to one package, in fixed order.
pub fn validate(pkg: &SkillPackage, limits: &Limits) -> Vec<Finding> {
    let mut findings = Vec::new();
    let skill_md = PathBuf::from(&pkg.folder).join("SKILL.md");

    if let Some(reason) = name_format_problem(&pkg.name, limits.max_name_len) {
        findings.push(Finding::new(
            &pkg.folder,
            FindingKind::InvalidNameFormat,
            format!("skill name '{}' {}", pkg.name, reason),
            &skill_md,
        ));
    }
    if pkg.folder != pkg.name {
        if let Some(reason) = name_format_problem(&pkg.folder, limits.max_name_len) {
            findings.push(Finding::new(
                &pkg.folder,
                FindingKind::InvalidNameFormat,
                format!("folder name '{}' {}", pkg.folder, reason),
                &skill_md,
            ));
        }
        findings.push(Finding::new(
            &pkg.folder,
            FindingKind::NameFolderMismatch,
            format!(
                "frontmatter name '{}' does not match folder name '{}'",
                pkg.name, pkg.folder
            ),
            &skill_md,
        ));
    }

    let description_chars = pkg.description.chars().count();
    if description_chars > limits.max_description_len {
        findings.push(Finding::new(
            &pkg.folder,
            FindingKind::DescriptionTooLong,
            format!(
                "description is {} characters, over the {} limit",
                description_chars, limits.max_description_len
            ),
            &skill_md,
        ));
    }

    if pkg.body_line_count >= limits.max_body_lines {
        findings.push(Finding::new(
            &pkg.folder,
            FindingKind::BodyTooLong,
            format!(
                "body has {} lines (limit {}); consider moving detail into references/",
                pkg.body_line_count, limits.max_body_lines
            ),
            &skill_md,
        ));
    }

    if let Some(heading) = when_to_use_heading(&pkg.body) {
        findings.push(Finding::new(
            &pkg.folder,
            FindingKind::RedundantSection,
            format!(
                "'{}' section duplicates what the description already covers",
                heading
            ),
            &skill_md,
        ));
    }

    for doc in &pkg.reference_docs {
        if doc.line_count > limits.toc_min_lines && !doc.has_toc_heading {
            findings.push(Finding::new(
                &pkg.folder,
                FindingKind::MissingToc,
                format!(
                    "{} has {} lines but no table-of-contents heading",
                    doc.path.display(),
                    doc.line_count
                ),
                PathBuf::from(&pkg.folder).join(&doc.path),
            ));
        }
    }

    findings
}

/// Returns why a name is not a valid kebab-case identifier, or None if it is
fn name_format_problem(name: &str, max_len: usize) -> Option<&'static str> {
    if name.is_empty() {
        return Some("is empty");
    }
    if name.len() > max_len {
        return Some("is over the length limit");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Some("must contain only lowercase letters, digits, and hyphens");
    }
    if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
        return Some("has a misplaced hyphen");
    }
    None
}

/// Find a "When to Use" heading in the body, returning its text
fn when_to_use_heading(body: &str) -> Option<&str> {
    body.lines().map(str::trim_start).find(|line| {
        line.starts_with('#') && line.to_ascii_lowercase().contains("when to use")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::ReferenceDoc;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn package(folder: &str, name: &str) -> SkillPackage {
        SkillPackage {
            folder: folder.to_string(),
            name: name.to_string(),
            description: "A test skill".to_string(),
            body: "Instructions.".to_string(),
            body_line_count: 1,
            reference_files: BTreeSet::new(),
            rule_files: BTreeSet::new(),
            reference_docs: Vec::new(),
            rules: Vec::new(),
            dir: PathBuf::from(folder),
        }
    }

    fn kinds(findings: &[Finding]) -> Vec<FindingKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_valid_package_yields_nothing() {
        let pkg = package("creating-presentations", "creating-presentations");
        assert!(validate(&pkg, &Limits::default()).is_empty());
    }

    #[test]
    fn test_uppercase_folder_yields_format_and_mismatch() {
        let pkg = package("My_Skill", "my-skill");
        let findings = validate(&pkg, &Limits::default());
        assert_eq!(
            kinds(&findings),
            vec![
                FindingKind::InvalidNameFormat,
                FindingKind::NameFolderMismatch
            ]
        );
    }

    #[test]
    fn test_name_mismatch_alone() {
        let pkg = package("convex", "convex-backend");
        let findings = validate(&pkg, &Limits::default());
        assert_eq!(kinds(&findings), vec![FindingKind::NameFolderMismatch]);
    }

    #[test]
    fn test_name_format_edge_cases() {
        assert!(name_format_problem("creating-presentations", 64).is_none());
        assert!(name_format_problem("skill2", 64).is_none());
        assert!(name_format_problem("My-Skill", 64).is_some());
        assert!(name_format_problem("my_skill", 64).is_some());
        assert!(name_format_problem("-leading", 64).is_some());
        assert!(name_format_problem("double--hyphen", 64).is_some());
        assert!(name_format_problem(&"x".repeat(65), 64).is_some());
        assert!(name_format_problem(&"x".repeat(64), 64).is_none());
    }

    #[test]
    fn test_description_over_limit() {
        let mut pkg = package("a-skill", "a-skill");
        pkg.description = "d".repeat(1025);
        let findings = validate(&pkg, &Limits::default());
        assert_eq!(kinds(&findings), vec![FindingKind::DescriptionTooLong]);
    }

    #[test]
    fn test_long_body_warns() {
        let mut pkg = package("a-skill", "a-skill");
        pkg.body_line_count = 500;
        let findings = validate(&pkg, &Limits::default());
        assert_eq!(kinds(&findings), vec![FindingKind::BodyTooLong]);
        assert_eq!(findings[0].severity, crate::findings::Severity::Warning);
    }

    #[test]
    fn test_when_to_use_heading_warns() {
        let mut pkg = package("a-skill", "a-skill");
        pkg.body = "# Overview\n\n## When to Use\n\nUse it when needed.\n".to_string();
        let findings = validate(&pkg, &Limits::default());
        assert_eq!(kinds(&findings), vec![FindingKind::RedundantSection]);
    }

    #[test]
    fn test_long_reference_without_toc_warns() {
        let mut pkg = package("convex", "convex");
        pkg.reference_docs = vec![
            ReferenceDoc {
                path: PathBuf::from("references/filtering.md"),
                line_count: 240,
                has_toc_heading: false,
            },
            ReferenceDoc {
                path: PathBuf::from("references/patterns.md"),
                line_count: 240,
                has_toc_heading: true,
            },
            ReferenceDoc {
                path: PathBuf::from("references/short.md"),
                line_count: 40,
                has_toc_heading: false,
            },
        ];
        let findings = validate(&pkg, &Limits::default());
        assert_eq!(kinds(&findings), vec![FindingKind::MissingToc]);
        assert_eq!(
            findings[0].path,
            PathBuf::from("convex/references/filtering.md")
        );
    }
}
