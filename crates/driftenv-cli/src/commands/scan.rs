//! Scan command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use driftenv_core::{EnvEntry, Match, scan_file};

use crate::context::Context;
use crate::error::{CliError, Result};

/// Report every occurrence of a resolved secret in the given files
pub async fn run_scan(ctx: &Context, paths: &[PathBuf]) -> Result<()> {
    let snapshot = ctx.snapshot().await?;

    let mut files = Vec::new();
    for path in paths {
        collect_files(path, &mut files)?;
    }

    let mut found: Vec<Match> = Vec::new();
    for file in &files {
        found.extend(scan_file(file, snapshot.entries())?);
    }

    if found.is_empty() {
        println!(
            "{} No secrets found in {} files.",
            "OK".green().bold(),
            files.len()
        );
        return Ok(());
    }

    for m in &found {
        print_match(m);
    }
    Err(CliError::SecretsFound { count: found.len() })
}

fn print_match(m: &Match) {
    let EnvEntry {
        key,
        provider_name,
        resolved_path,
        ..
    } = &m.entry;
    println!(
        "{}:{}:{} {} ({} {})",
        m.path.yellow(),
        m.line_number,
        m.match_index + 1,
        key.bold(),
        provider_name.cyan(),
        resolved_path.dimmed()
    );
}

/// Regular files under `path`, depth first, skipping hidden directories
fn collect_files(path: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    if path.is_file() {
        out.push(path.to_path_buf());
        return Ok(());
    }
    if !path.is_dir() {
        return Err(CliError::user(format!("No such file or directory: {}", path.display())));
    }

    let mut children: Vec<PathBuf> = std::fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    children.sort();

    for child in children {
        let hidden = child
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(false);
        if child.is_dir() && hidden {
            continue;
        }
        collect_files(&child, out)?;
    }
    Ok(())
}
