//! Findings taxonomy and report assembly.
//!
//! Every structural problem a validation run detects becomes a `Finding`:
//! a typed kind, a severity derived from that kind, a message, and the file
//! it is attributed to. Findings never abort the run; fatal conditions
//! (unreadable filesystem, bad root) are propagated as errors instead and
//! produce no report at all.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Finding kinds, one per structural check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingSkillFile,
    MissingFrontmatter,
    FrontmatterParse,
    UnrecognizedField,
    DescriptionTooLong,
    InvalidNameFormat,
    NameFolderMismatch,
    BodyTooLong,
    RedundantSection,
    MissingToc,
    BrokenReference,
    OrphanReference,
}

impl FindingKind {
    /// Severity is fixed per kind; warnings become failures only under --strict
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::MissingSkillFile
            | FindingKind::BodyTooLong
            | FindingKind::RedundantSection
            | FindingKind::MissingToc
            | FindingKind::OrphanReference => Severity::Warning,
            FindingKind::MissingFrontmatter
            | FindingKind::FrontmatterParse
            | FindingKind::UnrecognizedField
            | FindingKind::DescriptionTooLong
            | FindingKind::InvalidNameFormat
            | FindingKind::NameFolderMismatch
            | FindingKind::BrokenReference => Severity::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::MissingSkillFile => "missing_skill_file",
            FindingKind::MissingFrontmatter => "missing_frontmatter",
            FindingKind::FrontmatterParse => "frontmatter_parse",
            FindingKind::UnrecognizedField => "unrecognized_field",
            FindingKind::DescriptionTooLong => "description_too_long",
            FindingKind::InvalidNameFormat => "invalid_name_format",
            FindingKind::NameFolderMismatch => "name_folder_mismatch",
            FindingKind::BodyTooLong => "body_too_long",
            FindingKind::RedundantSection => "redundant_section",
            FindingKind::MissingToc => "missing_toc",
            FindingKind::BrokenReference => "broken_reference",
            FindingKind::OrphanReference => "orphan_reference",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validation finding, attributed to a skill and a file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Skill folder name (basename, not the frontmatter name)
    pub skill: String,
    pub severity: Severity,
    pub kind: FindingKind,
    pub message: String,
    /// Path relative to the scan root, e.g. `convex/SKILL.md`
    pub path: PathBuf,
}

impl Finding {
    pub fn new(
        skill: impl Into<String>,
        kind: FindingKind,
        message: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Finding {
            skill: skill.into(),
            severity: kind.severity(),
            kind,
            message: message.into(),
            path: path.into(),
        }
    }

    /// One-line human-readable rendering
    pub fn render(&self) -> String {
        format!(
            "{:7} {}: {} ({})",
            self.severity.to_string(),
            self.skill,
            self.message,
            self.path.display()
        )
    }
}

/// Aggregated result of one validation run
#[derive(Debug, Default, Clone, Serialize)]
pub struct Report {
    pub findings: Vec<Finding>,
    pub skills_scanned: usize,
}

impl Report {
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: Vec<Finding>) {
        self.findings.extend(findings);
    }

    /// Stable sort by skill name; within a skill, generation order is the
    /// fixed check order and is preserved.
    pub fn sort(&mut self) {
        self.findings.sort_by(|a, b| a.skill.cmp(&b.skill));
    }

    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    /// Whether this run should exit non-zero
    pub fn failed(&self, strict: bool) -> bool {
        self.error_count() > 0 || (strict && self.warning_count() > 0)
    }

    /// Human-readable report: one line per finding, then a summary line
    pub fn render_text(&self) -> String {
        let mut lines: Vec<String> = self.findings.iter().map(Finding::render).collect();
        lines.push(format!(
            "{} skills scanned: {} errors, {} warnings",
            self.skills_scanned,
            self.error_count(),
            self.warning_count()
        ));
        lines.join("\n")
    }

    /// Machine-readable report for --json
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "findings": self.findings,
            "summary": {
                "skills_scanned": self.skills_scanned,
                "errors": self.error_count(),
                "warnings": self.warning_count(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_per_kind() {
        assert_eq!(FindingKind::BrokenReference.severity(), Severity::Error);
        assert_eq!(FindingKind::OrphanReference.severity(), Severity::Warning);
        assert_eq!(FindingKind::MissingSkillFile.severity(), Severity::Warning);
        assert_eq!(FindingKind::MissingFrontmatter.severity(), Severity::Error);
    }

    #[test]
    fn test_report_counts_and_failure() {
        let mut report = Report::default();
        report.push(Finding::new(
            "a-skill",
            FindingKind::BodyTooLong,
            "body has 600 lines",
            "a-skill/SKILL.md",
        ));
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.failed(false));
        assert!(report.failed(true));

        report.push(Finding::new(
            "a-skill",
            FindingKind::BrokenReference,
            "references/missing.md does not exist",
            "a-skill/SKILL.md",
        ));
        assert_eq!(report.error_count(), 1);
        assert!(report.failed(false));
    }

    #[test]
    fn test_sort_is_stable_within_skill() {
        let mut report = Report::default();
        report.push(Finding::new(
            "zeta",
            FindingKind::BodyTooLong,
            "first",
            "zeta/SKILL.md",
        ));
        report.push(Finding::new(
            "alpha",
            FindingKind::InvalidNameFormat,
            "second",
            "alpha/SKILL.md",
        ));
        report.push(Finding::new(
            "zeta",
            FindingKind::OrphanReference,
            "third",
            "zeta/references/extra.md",
        ));
        report.sort();
        let skills: Vec<&str> = report.findings.iter().map(|f| f.skill.as_str()).collect();
        assert_eq!(skills, vec!["alpha", "zeta", "zeta"]);
        assert_eq!(report.findings[1].message, "first");
        assert_eq!(report.findings[2].message, "third");
    }

    #[test]
    fn test_json_shape() {
        let mut report = Report::default();
        report.skills_scanned = 2;
        report.push(Finding::new(
            "my-skill",
            FindingKind::NameFolderMismatch,
            "frontmatter name 'other' does not match folder 'my-skill'",
            "my-skill/SKILL.md",
        ));
        let value = report.to_json();
        assert_eq!(value["summary"]["errors"], 1);
        assert_eq!(value["summary"]["skills_scanned"], 2);
        assert_eq!(value["findings"][0]["kind"], "name_folder_mismatch");
        assert_eq!(value["findings"][0]["severity"], "error");
    }
}
