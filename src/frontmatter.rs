//! Frontmatter extraction and closed record shapes.
//!
//! Frontmatter is parsed into a closed set of shapes rather than duck-typed:
//! `SkillFrontmatter` for SKILL.md and `RuleFrontmatter` for rule files.
//! Any key outside the shape is rejected, never ignored.

use serde::Deserialize;
use thiserror::Error;

use crate::findings::FindingKind;

/// Keys permitted in SKILL.md frontmatter
const SKILL_KEYS: &[&str] = &["name", "description"];
/// Keys permitted in rule-file frontmatter
const RULE_KEYS: &[&str] = &["title", "impact", "tags"];

/// Frontmatter of a SKILL.md file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillFrontmatter {
    pub name: String,
    pub description: String,
}

/// Frontmatter of one rule file under rules/
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFrontmatter {
    pub title: String,
    pub impact: Impact,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Impact rating of a rule; a closed set, anything else fails the parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Impact {
    Critical,
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Critical => "CRITICAL",
            Impact::High => "HIGH",
            Impact::Medium => "MEDIUM",
            Impact::Low => "LOW",
        }
    }
}

/// Why a frontmatter block could not be parsed
#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("file does not start with a '---' frontmatter block")]
    Missing,

    #[error("frontmatter block is never closed by a '---' line")]
    Unterminated,

    #[error("unrecognized frontmatter field '{0}'")]
    UnknownField(String),

    #[error("frontmatter is not valid YAML: {0}")]
    Parse(String),
}

impl FrontmatterError {
    /// Finding kind this error is reported as
    pub fn kind(&self) -> FindingKind {
        match self {
            FrontmatterError::Missing | FrontmatterError::Unterminated => {
                FindingKind::MissingFrontmatter
            }
            FrontmatterError::UnknownField(_) => FindingKind::UnrecognizedField,
            FrontmatterError::Parse(_) => FindingKind::FrontmatterParse,
        }
    }
}

/// Split a Markdown document into its frontmatter YAML and body.
///
/// The opening `---` must be the first line of the file; the block runs to
/// the next line consisting of `---` alone. The returned body excludes the
/// delimiter lines.
pub fn split(content: &str) -> Result<(String, String), FrontmatterError> {
    let mut lines = content.lines();
    match lines.next() {
        Some(first) if first.trim_end() == "---" => {}
        _ => return Err(FrontmatterError::Missing),
    }

    let mut yaml = Vec::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == "---" {
            closed = true;
            break;
        }
        yaml.push(line);
    }
    if !closed {
        return Err(FrontmatterError::Unterminated);
    }

    let body: Vec<&str> = lines.collect();
    Ok((yaml.join("\n"), body.join("\n")))
}

/// Parse SKILL.md frontmatter into its closed shape
pub fn parse_skill(yaml: &str) -> Result<SkillFrontmatter, FrontmatterError> {
    parse_shape(yaml, SKILL_KEYS)
}

/// Parse rule-file frontmatter into its closed shape
pub fn parse_rule(yaml: &str) -> Result<RuleFrontmatter, FrontmatterError> {
    parse_shape(yaml, RULE_KEYS)
}

fn parse_shape<T: serde::de::DeserializeOwned>(
    yaml: &str,
    allowed: &[&str],
) -> Result<T, FrontmatterError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::Parse(e.to_string()))?;

    // Explicit key check first so the offending field is named precisely
    let mapping = value
        .as_mapping()
        .ok_or_else(|| FrontmatterError::Parse("frontmatter is not a key/value mapping".into()))?;
    for key in mapping.keys() {
        let key = key
            .as_str()
            .ok_or_else(|| FrontmatterError::Parse("frontmatter key is not a string".into()))?;
        if !allowed.contains(&key) {
            return Err(FrontmatterError::UnknownField(key.to_string()));
        }
    }

    serde_yaml::from_value(value).map_err(|e| FrontmatterError::Parse(e.to_string()))
}
