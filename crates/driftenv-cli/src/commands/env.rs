//! Env command implementation

use crate::context::Context;
use crate::error::Result;

/// Print resolved entries as dotenv lines, in snapshot order
pub async fn run_env(ctx: &Context) -> Result<()> {
    let snapshot = ctx.snapshot().await?;
    for entry in &snapshot {
        println!("{}={}", entry.key, quote(&entry.value));
    }
    Ok(())
}

/// Single-quote a value unless it is made of shell-safe characters
fn quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@%+,".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
