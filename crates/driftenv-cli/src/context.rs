//! Declarations and providers shared by every command

use std::path::{Path, PathBuf};

use driftenv_core::{Declarations, EnvEntryLookup, Resolver};
use driftenv_providers::resolver_for;

use crate::error::{CliError, Result};

/// Loaded declarations plus a resolver over their providers
#[derive(Debug)]
pub struct Context {
    pub config_path: PathBuf,
    pub declarations: Declarations,
    pub resolver: Resolver,
}

impl Context {
    /// Load the declarations file; provider paths resolve relative to it
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Err(CliError::user(format!(
                "Declarations file not found: {}. Pass one with --config.",
                config_path.display()
            )));
        }

        let declarations = Declarations::load(config_path)?;
        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let resolver = resolver_for(&declarations, base_dir)?;

        Ok(Self {
            config_path: config_path.to_path_buf(),
            declarations,
            resolver,
        })
    }

    pub async fn snapshot(&self) -> Result<EnvEntryLookup> {
        Ok(self.resolver.resolve(&self.declarations).await?)
    }
}
