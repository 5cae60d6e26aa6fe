//! One-shot validation run over a skill tree.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::discovery;
use crate::findings::Report;
use crate::package;
use crate::resolver;
use crate::validate;

/// Validate every skill folder under `root` and assemble the report.
///
/// Per-skill findings are collected in isolation; one skill's problems
/// never stop its siblings. Only filesystem-level failures abort the run.
pub fn run(root: &Path, config: &Config) -> Result<Report> {
    let exclude = config.exclude_patterns()?;
    let discovery = discovery::discover(root, &exclude)?;

    let mut report = Report {
        skills_scanned: discovery.scanned,
        ..Report::default()
    };
    report.extend(discovery.findings);

    for folder in &discovery.candidates {
        let loaded = package::load_skill(root, folder)?;
        report.extend(loaded.findings);
        if let Some(pkg) = loaded.package {
            report.extend(validate::validate(&pkg, &config.limits));
            report.extend(resolver::resolve(&pkg));
        }
    }

    report.sort();
    Ok(report)
}
