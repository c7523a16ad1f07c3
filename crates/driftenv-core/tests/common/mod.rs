use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use driftenv_core::{EnvEntry, Error, KeyPath, Provider, Result};

/// Read-only provider with a fixed value table and per-path delays
#[derive(Debug, Default)]
pub struct FakeProvider {
    pub name: String,
    pub values: HashMap<String, String>,
    pub mappings: HashMap<String, Vec<(String, String)>>,
    pub delays: HashMap<String, u64>,
}

impl FakeProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn value(mut self, path: &str, value: &str) -> Self {
        self.values.insert(path.to_string(), value.to_string());
        self
    }

    pub fn mapping(mut self, path: &str, fields: &[(&str, &str)]) -> Self {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.mappings.insert(path.to_string(), fields);
        self
    }

    pub fn delay(mut self, path: &str, millis: u64) -> Self {
        self.delays.insert(path.to_string(), millis);
        self
    }

    async fn wait(&self, path: &str) {
        if let Some(ms) = self.delays.get(path) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "fake"
    }

    async fn get_mapping(&self, kp: &KeyPath) -> Result<Vec<EnvEntry>> {
        self.wait(&kp.path).await;
        match self.mappings.get(&kp.path) {
            Some(fields) => Ok(fields
                .iter()
                .map(|(k, v)| kp.found(self, kp.remapped_key(k), v, format!("{}/{}", kp.path, k)))
                .collect()),
            None if kp.optional => Ok(Vec::new()),
            None => Err(Error::resolution(&self.name, &kp.path, "not found")),
        }
    }

    async fn get(&self, kp: &KeyPath) -> Result<Option<EnvEntry>> {
        self.wait(&kp.path).await;
        match self.values.get(&kp.path) {
            Some(v) => Ok(Some(kp.found(self, &kp.env, v, &kp.path))),
            None if kp.optional => Ok(None),
            None => Err(Error::resolution(&self.name, &kp.path, "not found")),
        }
    }

    async fn put(&self, kp: &KeyPath, _value: &str) -> Result<()> {
        Err(Error::write(&self.name, &kp.path, "read-only"))
    }
}
