//! skillcheck CLI entrypoint.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use skillcheck::config::Config;
use skillcheck::runner;

/// Validate a tree of agent skill packages
#[derive(Debug, Parser)]
#[command(name = "skillcheck", version, about)]
struct Cli {
    /// Root directory containing skill folders
    root: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,

    /// Emit the findings report as JSON
    #[arg(long)]
    json: bool,

    /// Extra config file, applied on top of user and project config
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(failed) => {
            if failed {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("skillcheck: fatal: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.strict {
        config.strict = true;
    }

    let report = runner::run(&cli.root, &config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        println!("{}", report.render_text());
    }

    Ok(report.failed(config.strict))
}
