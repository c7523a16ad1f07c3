//! Drift command implementation
//!
//! Entries labeled with `source` are compared against entries labeled with
//! a matching `sink`.

use colored::Colorize;
use driftenv_core::{DriftEngine, DriftKind, DriftedEntry, EnvEntry, split_by_role};
use serde_json::{Value, json};

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the drift command; drift found is reported as an error
pub async fn run_drift(ctx: &Context, strict: bool, reveal: bool, json: bool) -> Result<()> {
    let snapshot = ctx.snapshot().await?;
    let (sources, targets) = split_by_role(&snapshot);

    let engine = if strict {
        DriftEngine::strict()
    } else {
        DriftEngine::new()
    };
    let drifts = engine.compare(&sources, &targets)?;

    if json {
        let rows: Vec<Value> = drifts.iter().map(|d| drift_json(d, reveal)).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "has_drift": !drifts.is_empty(),
                "compared": sources.len(),
                "drifts": rows,
            }))?
        );
    } else {
        print_drift_output(&drifts, sources.len(), reveal);
    }

    if drifts.is_empty() {
        Ok(())
    } else {
        Err(CliError::DriftDetected {
            count: drifts.len(),
        })
    }
}

fn shown(entry: &EnvEntry, reveal: bool) -> String {
    if reveal {
        entry.value.clone()
    } else {
        entry.redacted()
    }
}

fn drift_json(drift: &DriftedEntry, reveal: bool) -> Value {
    json!({
        "label": drift.label(),
        "key": drift.key(),
        "kind": drift.kind,
        "source": {
            "provider": drift.source.provider_name,
            "path": drift.source.resolved_path,
            "value": shown(&drift.source, reveal),
        },
        "target": drift.target.as_ref().map(|t| json!({
            "provider": t.provider_name,
            "path": t.resolved_path,
            "value": shown(t, reveal),
        })),
        "diff": if reveal { Some(drift.diff.as_str()) } else { None },
    })
}

fn print_drift_output(drifts: &[DriftedEntry], compared: usize, reveal: bool) {
    if drifts.is_empty() {
        println!(
            "{} No drift across {} source entries.",
            "OK".green().bold(),
            compared
        );
        return;
    }

    println!("{}", "Drift".blue().bold());
    println!();

    for drift in drifts {
        let source = &drift.source;
        match (&drift.kind, &drift.target) {
            (DriftKind::Changed, Some(target)) => {
                println!(
                    "  {} [{}] {} {} {}={} -> {}={}",
                    "~".yellow(),
                    drift.label().cyan(),
                    drift.key().bold(),
                    "changed".yellow(),
                    source.provider_name,
                    shown(source, reveal),
                    target.provider_name,
                    shown(target, reveal),
                );
                if reveal {
                    for line in drift.diff.lines() {
                        println!("      {}", colorize_diff_line(line));
                    }
                }
            }
            _ => {
                println!(
                    "  {} [{}] {} {} in target ({} {})",
                    "-".red(),
                    drift.label().cyan(),
                    drift.key().bold(),
                    "missing".red(),
                    source.provider_name,
                    source.resolved_path.dimmed(),
                );
            }
        }
    }
    println!();
}

fn colorize_diff_line(line: &str) -> String {
    if line.starts_with('+') {
        line.green().to_string()
    } else if line.starts_with('-') {
        line.red().to_string()
    } else {
        line.to_string()
    }
}
