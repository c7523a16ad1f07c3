//! Snapshot assembly from declarations and providers

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::{Declarations, Lookup};
use crate::entry::EnvEntry;
use crate::error::{Error, Result};
use crate::lookup::EnvEntryLookup;
use crate::provider::Provider;

/// Resolves declarations against a registry of named providers
///
/// Each lookup runs as its own task. Results are reassembled in declaration
/// order, so the snapshot does not depend on which provider answers first.
#[derive(Clone, Default)]
pub struct Resolver {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.providers.keys().collect();
        names.sort();
        f.debug_struct("Resolver").field("providers", &names).finish()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under `name`, replacing any previous one
    pub fn with_provider(mut self, name: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
        self.register(name, provider);
        self
    }

    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    pub fn provider(&self, name: &str) -> Result<Arc<dyn Provider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownProvider {
                name: name.to_string(),
            })
    }

    /// Resolve every declared lookup into one snapshot
    ///
    /// The first provider error fails the whole resolution.
    pub async fn resolve(&self, decls: &Declarations) -> Result<EnvEntryLookup> {
        let mut tasks = JoinSet::new();

        for (idx, (name, lookup)) in decls.lookups().into_iter().enumerate() {
            let provider = self.provider(name)?;
            tasks.spawn(async move { (idx, run_lookup(provider.as_ref(), lookup).await) });
        }

        let mut resolved: Vec<(usize, Vec<EnvEntry>)> = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let (idx, outcome) = joined?;
            resolved.push((idx, outcome?));
        }
        resolved.sort_by_key(|(idx, _)| *idx);

        let snapshot: EnvEntryLookup = resolved
            .into_iter()
            .flat_map(|(_, entries)| entries)
            .collect();
        tracing::debug!(entries = snapshot.len(), "resolved snapshot");
        Ok(snapshot)
    }
}

async fn run_lookup(provider: &dyn Provider, lookup: Lookup) -> Result<Vec<EnvEntry>> {
    match lookup {
        Lookup::Mapping(kp) => {
            let entries = provider.get_mapping(&kp).await?;
            tracing::debug!(
                provider = provider.name(),
                path = %kp.path,
                entries = entries.len(),
                "resolved mapping"
            );
            Ok(entries)
        }
        Lookup::Scalar(kp) => match provider.get(&kp).await? {
            Some(entry) => {
                tracing::debug!(provider = provider.name(), key = %entry.key, "resolved value");
                Ok(vec![entry])
            }
            None => {
                tracing::warn!(
                    provider = provider.name(),
                    env = %kp.env,
                    path = %kp.path,
                    "optional value not found"
                );
                Ok(Vec::new())
            }
        },
    }
}
