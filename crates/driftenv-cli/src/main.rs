//! driftenv CLI
//!
//! Resolves declared keys across providers, shows them redacted, and
//! reports drift between environments.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} environment drift detection", "driftenv".green().bold());
        println!();
        println!("Run {} for available commands.", "driftenv --help".cyan());
        return Ok(());
    };

    let ctx = Context::load(&cli.config)?;
    execute_command(&ctx, command).await
}

async fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Show { json } => commands::run_show(ctx, json).await,
        Commands::Env => commands::run_env(ctx).await,
        Commands::Drift {
            strict,
            reveal,
            json,
        } => commands::run_drift(ctx, strict, reveal, json).await,
        Commands::Scan { paths } => commands::run_scan(ctx, &paths).await,
        Commands::Redact => commands::run_redact(ctx).await,
        Commands::Put {
            provider,
            path,
            field,
            value,
        } => commands::run_put(ctx, &provider, &path, field.as_deref(), &value).await,
    }
}
