//! CLI entry point
//!
//! Builds the harness from configuration and arguments, prints failures as
//! they happen and finishes with a one-line summary.

use colored::Colorize;

use crate::commands::Cli;
use crate::common::config::Config;
use crate::common::{paths, Error, Result};
use crate::discovery::{Conventions, Walker};
use crate::harness::Harness;
use crate::invoke::ExternalTool;
use crate::report::{CaseOutcome, CaseStatus, RunReport};
use crate::synth::{ScriptFile, Synthesizer};

/// Run the harness and return the process exit code
pub async fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli)?;

    if !cli.tests_dir.is_dir() {
        return Err(Error::TestsRootMissing(cli.tests_dir.display().to_string()));
    }
    let binary = paths::resolve_tool(&cli.tool)?;

    let walker = Walker::new(&cli.tests_dir, Conventions::from(&config.discovery))
        .sorted(config.discovery.sort);
    let synthesizer = Synthesizer::new(config.script.clone())?;
    let script = ScriptFile::new(config.script.path.clone());
    let tool = ExternalTool::new(binary, &config.tool);

    let harness = Harness::new(walker, synthesizer, script, tool, cli.reference.clone());
    let report = harness.run(print_outcome).await;

    print_summary(&report);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&json_report(&report))?);
    }

    Ok(report.exit_code())
}

/// Config file values, overridden by command-line flags
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(secs) = cli.timeout {
        config.tool.timeout_secs = secs;
    }
    if let Some(script) = &cli.script {
        config.script.path = script.clone();
    }
    Ok(config)
}

/// Report with its totals, as printed by `--json`
fn json_report(report: &RunReport) -> serde_json::Value {
    serde_json::json!({
        "total": report.total(),
        "passed": report.passed(),
        "failed": report.failures(),
        "outcomes": report.outcomes,
    })
}

fn print_outcome(outcome: &CaseOutcome) {
    let Some(line) = outcome.failure_line() else {
        return;
    };

    match outcome.status {
        CaseStatus::MissingExpectation { .. } => println!("{}", line.yellow()),
        _ => {
            println!("{}", outcome.stdout);
            println!("{}", outcome.stderr);
            println!("{}", line.red());
        }
    }
}

fn print_summary(report: &RunReport) {
    let summary = report.summary();
    if report.exit_code() == 0 {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}
