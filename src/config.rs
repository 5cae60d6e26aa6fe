//! Layered validator configuration.
//!
//! Priority: CLI-supplied file (--config) > project (./skillcheck.toml) >
//! user (~/.skillcheck/config.toml) > built-in defaults. Limit fields
//! override per-field; exclude lists are concatenated. Unknown keys in a
//! config file are rejected, matching the frontmatter contract.

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Deserialize;
use std::path::Path;

/// Numeric limits applied by the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum length of a skill or folder name
    pub max_name_len: usize,
    /// Maximum description length in characters
    pub max_description_len: usize,
    /// SKILL.md body line count that triggers the split-into-references warning
    pub max_body_lines: usize,
    /// Reference files longer than this must carry a table-of-contents heading
    pub toc_min_lines: usize,
}

fn default_max_name_len() -> usize {
    64
}
fn default_max_description_len() -> usize {
    1024
}
fn default_max_body_lines() -> usize {
    500
}
fn default_toc_min_lines() -> usize {
    100
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_name_len: default_max_name_len(),
            max_description_len: default_max_description_len(),
            max_body_lines: default_max_body_lines(),
            toc_min_lines: default_toc_min_lines(),
        }
    }
}

/// Resolved configuration for one run
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub limits: Limits,
    /// Glob patterns over skill folder names to skip entirely
    pub exclude: Vec<String>,
    /// Treat warnings as errors
    pub strict: bool,
}

/// On-disk config shape; every field optional so layers merge per-field
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    limits: LimitsFile,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    strict: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsFile {
    #[serde(default)]
    max_name_len: Option<usize>,
    #[serde(default)]
    max_description_len: Option<usize>,
    #[serde(default)]
    max_body_lines: Option<usize>,
    #[serde(default)]
    toc_min_lines: Option<usize>,
}

impl Config {
    /// Load configuration from default locations plus an optional explicit
    /// file. Default-location files may be absent; an explicit file must
    /// exist and parse, otherwise the run is aborted.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".skillcheck").join("config.toml");
            if user_config.exists() {
                config.merge(load_file(&user_config)?);
            }
        }

        let project_config = Path::new("skillcheck.toml");
        if project_config.exists() {
            config.merge(load_file(project_config)?);
        }

        if let Some(path) = explicit {
            config.merge(load_file(path)?);
        }

        Ok(config)
    }

    /// Merge a file layer into this config (the file takes priority).
    /// Scalars override when set; exclude lists concatenate.
    fn merge(&mut self, other: ConfigFile) {
        if let Some(v) = other.limits.max_name_len {
            self.limits.max_name_len = v;
        }
        if let Some(v) = other.limits.max_description_len {
            self.limits.max_description_len = v;
        }
        if let Some(v) = other.limits.max_body_lines {
            self.limits.max_body_lines = v;
        }
        if let Some(v) = other.limits.toc_min_lines {
            self.limits.toc_min_lines = v;
        }
        self.exclude.extend(other.exclude);
        if let Some(strict) = other.strict {
            self.strict = strict;
        }
    }

    /// Compile the exclude globs; a malformed pattern is fatal
    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>> {
        self.exclude
            .iter()
            .map(|raw| {
                Pattern::new(raw).with_context(|| format!("invalid exclude pattern '{}'", raw))
            })
            .collect()
    }
}

fn load_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_name_len, 64);
        assert_eq!(limits.max_description_len, 1024);
        assert_eq!(limits.max_body_lines, 500);
        assert_eq!(limits.toc_min_lines, 100);
    }

    #[test]
    fn test_merge_overrides_per_field() {
        let mut config = Config::default();
        let layer: ConfigFile = toml::from_str("[limits]\nmax_body_lines = 300\n").unwrap();
        config.merge(layer);
        assert_eq!(config.limits.max_body_lines, 300);
        // untouched fields keep their defaults
        assert_eq!(config.limits.max_name_len, 64);
    }

    #[test]
    fn test_merge_concatenates_excludes() {
        let mut config = Config::default();
        let user: ConfigFile = toml::from_str("exclude = [\"drafts-*\"]\n").unwrap();
        let project: ConfigFile =
            toml::from_str("exclude = [\"archive\"]\nstrict = true\n").unwrap();
        config.merge(user);
        config.merge(project);
        assert_eq!(config.exclude, vec!["drafts-*", "archive"]);
        assert!(config.strict);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: std::result::Result<ConfigFile, _> = toml::from_str("colour = \"red\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(Config::load(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_explicit_file_loaded() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("skillcheck.toml");
        fs::write(&path, "strict = true\n[limits]\ntoc_min_lines = 50\n").unwrap();
        let config = Config::load(Some(path.as_path())).unwrap();
        assert!(config.strict);
        assert_eq!(config.limits.toc_min_lines, 50);
    }

    #[test]
    fn test_bad_exclude_pattern_is_fatal() {
        let config = Config {
            exclude: vec!["[".to_string()],
            ..Config::default()
        };
        assert!(config.exclude_patterns().is_err());
    }
}
