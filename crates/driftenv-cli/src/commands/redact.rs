//! Redact command implementation

use std::io::{Read, Write};

use driftenv_core::Redactor;

use crate::context::Context;
use crate::error::Result;

/// Copy stdin to stdout with every resolved value replaced
pub async fn run_redact(ctx: &Context) -> Result<()> {
    let snapshot = ctx.snapshot().await?;
    let redactor = Redactor::new(&snapshot);

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(redactor.redact(&input).as_bytes())?;
    stdout.flush()?;
    Ok(())
}
