//! skillcheck: validate trees of agent skill packages.
//!
//! A skill package is a folder holding a `SKILL.md` with YAML frontmatter,
//! optional `references/*.md` documents linked from the body, and an
//! optional `rules/` folder of individual do/don't patterns. This crate
//! discovers those folders, parses them into immutable models, and reports
//! every structural deviation from the packaging convention as a typed
//! finding.

pub mod config;
pub mod discovery;
pub mod findings;
pub mod frontmatter;
pub mod package;
pub mod resolver;
pub mod runner;
pub mod validate;

pub use config::{Config, Limits};
pub use findings::{Finding, FindingKind, Report, Severity};
pub use package::{Rule, SkillPackage};
