//! Key path declarations
//!
//! Declarations name each provider instance and the key paths to resolve
//! from it. They are loaded from YAML, JSON, or TOML, with the format
//! detected from the file extension.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keypath::KeyPath;

/// Key paths to resolve from one named provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderDeclaration {
    /// Backend kind, used by callers that construct providers
    #[serde(default)]
    pub kind: String,

    /// Backend-specific construction options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,

    /// Locators expanded into many entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_sync: Vec<KeyPath>,

    /// Environment variable name -> scalar locator
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, KeyPath>,
}

/// A full declaration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Declarations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default)]
    pub providers: BTreeMap<String, ProviderDeclaration>,
}

/// One unit of resolution work derived from the declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Expand into many entries via `Provider::get_mapping`
    Mapping(KeyPath),
    /// Resolve one value via `Provider::get`
    Scalar(KeyPath),
}

impl Lookup {
    pub fn key_path(&self) -> &KeyPath {
        match self {
            Self::Mapping(kp) | Self::Scalar(kp) => kp,
        }
    }
}

impl Declarations {
    /// Load declarations from a file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let parse_error = |format: &str, message: String| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.into(),
            message,
        };

        let decls: Declarations = match extension.as_str() {
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| parse_error("YAML", e.to_string()))?
            }
            "json" => {
                serde_json::from_str(&content).map_err(|e| parse_error("JSON", e.to_string()))?
            }
            "toml" => toml::from_str(&content).map_err(|e| parse_error("TOML", e.to_string()))?,
            _ => {
                return Err(Error::UnsupportedFormat {
                    extension: extension.clone(),
                });
            }
        };

        decls.validate()?;
        tracing::debug!(
            path = %path.display(),
            providers = decls.providers.len(),
            "loaded declarations"
        );
        Ok(decls)
    }

    /// Parse declarations from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Self> {
        let decls: Declarations =
            serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
                path: "<inline>".into(),
                format: "YAML".into(),
                message: e.to_string(),
            })?;
        decls.validate()?;
        Ok(decls)
    }

    /// Check every declared key path
    pub fn validate(&self) -> Result<()> {
        for (name, decl) in &self.providers {
            for lookup in decl.lookups() {
                lookup.key_path().validate().map_err(|e| match e {
                    Error::InvalidKeyPath { message } => Error::InvalidKeyPath {
                        message: format!("provider '{}': {}", name, message),
                    },
                    other => other,
                })?;
            }
        }
        Ok(())
    }

    /// Every lookup in declaration order, paired with its provider name
    ///
    /// Providers come in name order; within a provider, `env_sync` entries
    /// come first in file order, then `env` entries by variable name.
    pub fn lookups(&self) -> Vec<(&str, Lookup)> {
        self.providers
            .iter()
            .flat_map(|(name, decl)| {
                decl.lookups()
                    .into_iter()
                    .map(move |lookup| (name.as_str(), lookup))
            })
            .collect()
    }
}

impl ProviderDeclaration {
    /// Lookups for this provider; scalar key paths get their `env` filled in
    pub fn lookups(&self) -> Vec<Lookup> {
        let mappings = self.env_sync.iter().cloned().map(Lookup::Mapping);
        let scalars = self
            .env
            .iter()
            .map(|(env, kp)| Lookup::Scalar(kp.with_env(env.as_str())));
        mappings.chain(scalars).collect()
    }
}
