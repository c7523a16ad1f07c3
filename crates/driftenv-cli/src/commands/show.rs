//! Show command implementation

use colored::Colorize;
use driftenv_core::{EntriesByKey, SortOrder};
use serde_json::json;

use crate::context::Context;
use crate::error::Result;

/// Print every resolved entry with its value redacted by severity
pub async fn run_show(ctx: &Context, json: bool) -> Result<()> {
    let snapshot = ctx.snapshot().await?;
    let mut entries = snapshot.into_entries();
    EntriesByKey::sort(&mut entries);

    if json {
        let rows: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "key": e.key,
                    "value": e.redacted(),
                    "provider": e.provider_name,
                    "path": e.resolved_path,
                    "severity": e.severity,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Entries".blue().bold(),
        ctx.config_path.display().to_string().yellow()
    );
    println!();

    if entries.is_empty() {
        println!("  {}", "No entries resolved.".dimmed());
        return Ok(());
    }

    for entry in &entries {
        println!(
            "  [{} {}] {} = {}",
            entry.provider_name.cyan(),
            entry.resolved_path.dimmed(),
            entry.key.bold(),
            entry.redacted()
        );
    }
    Ok(())
}
