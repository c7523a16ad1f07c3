//! In-memory provider for testing and local development

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use driftenv_core::{EnvEntry, Error, KeyPath, Provider, Result};
use tokio::sync::RwLock;

use crate::decrypt::Decryptor;
use crate::document::{self, Document, SecretNode};

pub const MEMORY_KIND: &str = "memory";

/// Provider backed by a document held in memory
///
/// Values are lost when the provider is dropped.
pub struct MemoryProvider {
    name: String,
    data: RwLock<Document>,
    decryptor: Option<Arc<dyn Decryptor>>,
    read_only: bool,
}

impl std::fmt::Debug for MemoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProvider")
            .field("name", &self.name)
            .field("read_only", &self.read_only)
            .field("decryptor", &self.decryptor.is_some())
            .finish_non_exhaustive()
    }
}

impl MemoryProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: RwLock::new(Document::new()),
            decryptor: None,
            read_only: false,
        }
    }

    /// Seed a scalar value at `path`
    pub fn with_value(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.data
            .get_mut()
            .insert(path.into(), SecretNode::Value(value.into()));
        self
    }

    /// Seed a table of fields at `path`
    pub fn with_fields<K, V>(
        mut self,
        path: impl Into<String>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields: BTreeMap<String, String> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.data
            .get_mut()
            .insert(path.into(), SecretNode::Fields(fields));
        self
    }

    pub fn with_decryptor(mut self, decryptor: Arc<dyn Decryptor>) -> Self {
        self.decryptor = Some(decryptor);
        self
    }

    /// Reject every `put`
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Copy of the stored document
    pub async fn document(&self) -> Document {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        MEMORY_KIND
    }

    async fn get_mapping(&self, key_path: &KeyPath) -> Result<Vec<EnvEntry>> {
        let doc = self.data.read().await;
        document::get_mapping_entries(self, &doc, key_path, self.decryptor.as_deref())
    }

    async fn get(&self, key_path: &KeyPath) -> Result<Option<EnvEntry>> {
        let doc = self.data.read().await;
        document::get_entry(self, &doc, key_path, self.decryptor.as_deref())
    }

    async fn put(&self, key_path: &KeyPath, value: &str) -> Result<()> {
        if self.read_only {
            return Err(Error::write(&self.name, &key_path.path, "provider is read-only"));
        }
        let mut doc = self.data.write().await;
        document::put_value(&self.name, &mut doc, key_path, value)?;
        tracing::debug!(provider = %self.name, path = %key_path.path, "stored value");
        Ok(())
    }
}
