//! Put command implementation

use colored::Colorize;
use driftenv_core::KeyPath;

use crate::context::Context;
use crate::error::Result;

/// Write one value through a named provider
pub async fn run_put(
    ctx: &Context,
    provider: &str,
    path: &str,
    field: Option<&str>,
    value: &str,
) -> Result<()> {
    let provider = ctx.resolver.provider(provider)?;
    let mut key_path = KeyPath::new(path);
    if let Some(field) = field {
        key_path = key_path.with_field(field);
    }
    key_path.validate()?;

    provider.put(&key_path, value).await?;

    let location = match field {
        Some(f) => format!("{}#{}", path, f),
        None => path.to_string(),
    };
    println!(
        "{} Wrote {} via {}",
        "OK".green().bold(),
        location.yellow(),
        provider.name().cyan()
    );
    Ok(())
}
