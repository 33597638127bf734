// Script replay

use super::load_config;
use crate::script::{execute, Outcome, RunReport, Script};
use anyhow::Context;
use endorsement_registry::{EndorsementRegistry, Identity, TracingSink};
use std::path::Path;

/// Build a registry from `config_path` and replay `script_path` against it.
///
/// # Arguments
/// * `config_path` - Registry configuration (TOML)
/// * `script_path` - Operation script (TOML)
/// * `creator` - Identity creating the registry; controller if the config names none
/// * `json` - Print the report as JSON instead of text
pub fn run(
    config_path: &Path,
    script_path: &Path,
    creator: Option<Identity>,
    json: bool,
) -> anyhow::Result<RunReport> {
    let config = load_config(config_path)?;
    let script = Script::load(script_path)
        .with_context(|| format!("loading script {}", script_path.display()))?;

    let mut registry = EndorsementRegistry::create(creator.unwrap_or_default(), config);
    registry.subscribe(TracingSink);

    tracing::info!(steps = script.steps.len(), "replaying script");
    let report = execute(&mut registry, &script);

    if json {
        let rendered = serde_json::to_string_pretty(&report).context("rendering report")?;
        println!("{rendered}");
    } else {
        print_report(&report);
    }
    Ok(report)
}

fn print_report(report: &RunReport) {
    println!("Registry:   {}", report.registry_id);
    println!("Controller: {}", report.controller);
    println!();

    for step in &report.steps {
        match &step.outcome {
            Outcome::Notified { event } => match event.comment() {
                Some(comment) => println!(
                    "[{:>3}] {:<8} ok       {} {} \"{}\"",
                    step.index,
                    step.op,
                    event.kind(),
                    event.identity(),
                    comment
                ),
                None => println!(
                    "[{:>3}] {:<8} ok       {} {}",
                    step.index,
                    step.op,
                    event.kind(),
                    event.identity()
                ),
            },
            Outcome::Rejected { error } => {
                println!("[{:>3}] {:<8} rejected {}", step.index, step.op, error)
            }
            Outcome::Status { identity, state } => {
                println!("[{:>3}] {:<8} {identity} is {state}", step.index, step.op)
            }
        }
    }

    println!();
    println!("Final state ({} tracked):", report.snapshot.len());
    for (identity, state) in &report.snapshot {
        println!("  {identity}  {state}");
    }
    if report.rejected() > 0 {
        println!("\n{} step(s) rejected", report.rejected());
    }
}
