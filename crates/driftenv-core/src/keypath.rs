//! Declarative key locators
//!
//! A [`KeyPath`] describes where a logical key lives inside a provider and
//! how the resolved value is displayed. Defaults for `severity` and
//! `redact_with` are filled in when the declaration is deserialized.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entry::EnvEntry;
use crate::error::{Error, Result};
use crate::provider::Provider;

/// Placeholder shown instead of a value redacted at `high` severity
pub const DEFAULT_REDACT_WITH: &str = "**REDACTED**";

fn default_redact_with() -> String {
    DEFAULT_REDACT_WITH.to_string()
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// How strongly a value is masked when displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    High,
    Medium,
    Low,
    None,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::None => write!(f, "none"),
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "none" => Ok(Self::None),
            other => Err(Error::InvalidKeyPath {
                message: format!("unknown severity '{}'", other),
            }),
        }
    }
}

/// Where to find a value in a provider, and how to present it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPath {
    /// Environment variable the value resolves to; empty for mapping lookups
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub env: String,

    /// Backend-specific locator
    pub path: String,

    /// Sub-field within a structured secret
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub field: String,

    /// Provider key -> output key renames applied when expanding a mapping
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub remap: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub decrypt: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default = "default_redact_with")]
    pub redact_with: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sink: String,
}

impl KeyPath {
    /// Create a key path at `path` with every other field at its default
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            env: String::new(),
            path: path.into(),
            field: String::new(),
            remap: BTreeMap::new(),
            decrypt: false,
            optional: false,
            severity: Severity::default(),
            redact_with: default_redact_with(),
            source: String::new(),
            sink: String::new(),
        }
    }

    /// Copy of this key path resolving to `env`; nothing else changes
    pub fn with_env(&self, env: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            ..self.clone()
        }
    }

    /// Copy of this key path located at `path`; nothing else changes
    pub fn switch_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn with_remap(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.remap.insert(from.into(), to.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_redact_with(mut self, placeholder: impl Into<String>) -> Self {
        self.redact_with = placeholder.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_sink(mut self, sink: impl Into<String>) -> Self {
        self.sink = sink.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn decrypted(mut self) -> Self {
        self.decrypt = true;
        self
    }

    /// Check that the key path is usable
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(Error::InvalidKeyPath {
                message: match self.env.as_str() {
                    "" => "path must not be empty".to_string(),
                    env => format!("path must not be empty (env '{}')", env),
                },
            });
        }
        Ok(())
    }

    /// Output name for a provider-native key, falling back to the key itself
    pub fn remapped_key<'a>(&'a self, native: &'a str) -> &'a str {
        self.remap.get(native).map(String::as_str).unwrap_or(native)
    }

    /// Field to read from a structured secret: `field`, else `env`
    pub fn effective_field(&self) -> &str {
        if self.field.is_empty() {
            &self.env
        } else {
            &self.field
        }
    }

    /// Build the entry a provider produced for this key path
    pub fn found<P: Provider + ?Sized>(
        &self,
        provider: &P,
        key: impl Into<String>,
        value: impl Into<String>,
        resolved_path: impl Into<String>,
    ) -> EnvEntry {
        EnvEntry {
            key: key.into(),
            value: value.into(),
            provider_name: provider.name().to_string(),
            provider: provider.kind().to_string(),
            resolved_path: resolved_path.into(),
            severity: self.severity,
            redact_with: self.redact_with.clone(),
            source: self.source.clone(),
            sink: self.sink.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> KeyPath {
        KeyPath::new("secret/prod/app")
            .with_field("password")
            .with_remap("DB_PASS", "DATABASE_PASSWORD")
            .with_severity(Severity::Medium)
            .with_redact_with("<hidden>")
            .with_source("prod")
            .with_sink("staging")
            .optional()
            .decrypted()
    }

    #[test]
    fn test_new_fills_defaults() {
        let kp = KeyPath::new("a/b");
        assert_eq!(kp.severity, Severity::High);
        assert_eq!(kp.redact_with, DEFAULT_REDACT_WITH);
        assert!(kp.remap.is_empty());
        assert!(!kp.optional);
    }

    #[test]
    fn test_with_env_changes_only_env() {
        let kp = sample();
        let derived = kp.with_env("DB_PASSWORD");

        assert_eq!(derived.env, "DB_PASSWORD");
        assert_eq!(
            KeyPath {
                env: String::new(),
                ..derived
            },
            kp
        );
        assert!(kp.env.is_empty());
    }

    #[test]
    fn test_switch_path_changes_only_path() {
        let kp = sample().with_env("X");
        let derived = kp.switch_path("secret/staging/app");

        assert_eq!(derived.path, "secret/staging/app");
        assert_eq!(kp.path, "secret/prod/app");
        assert_eq!(derived.switch_path("secret/prod/app"), kp);
    }

    #[test]
    fn test_derived_remap_is_independent() {
        let kp = sample();
        let mut derived = kp.with_env("X");
        derived.remap.insert("extra".into(), "EXTRA".into());
        assert_eq!(kp.remap.len(), 1);
    }

    #[test]
    fn test_remapped_key_passes_through_unknown() {
        let kp = sample();
        assert_eq!(kp.remapped_key("DB_PASS"), "DATABASE_PASSWORD");
        assert_eq!(kp.remapped_key("DB_USER"), "DB_USER");
    }

    #[test]
    fn test_effective_field_falls_back_to_env() {
        let kp = KeyPath::new("p").with_env("TOKEN");
        assert_eq!(kp.effective_field(), "TOKEN");
        assert_eq!(kp.with_field("tok").effective_field(), "tok");
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        assert!(KeyPath::new("").validate().is_err());
        assert!(KeyPath::new("  ").with_env("X").validate().is_err());
        assert!(KeyPath::new("p").validate().is_ok());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let kp: KeyPath = serde_yaml::from_str("path: secret/app\nenv: TOKEN\n").unwrap();
        assert_eq!(kp.severity, Severity::High);
        assert_eq!(kp.redact_with, "**REDACTED**");
        assert_eq!(kp.env, "TOKEN");
    }

    #[test]
    fn test_deserialize_full_declaration() {
        let yaml = r#"
path: secret/app
field: pw
remap:
  pw: PASSWORD
decrypt: true
optional: true
severity: none
redact_with: "xxx"
source: prod
sink: dev
"#;
        let kp: KeyPath = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(kp.severity, Severity::None);
        assert_eq!(kp.redact_with, "xxx");
        assert_eq!(kp.remapped_key("pw"), "PASSWORD");
        assert!(kp.decrypt && kp.optional);
        assert_eq!((kp.source.as_str(), kp.sink.as_str()), ("prod", "dev"));
    }

    #[test]
    fn test_severity_from_str_and_display() {
        for s in ["high", "medium", "low", "none"] {
            assert_eq!(s.parse::<Severity>().unwrap().to_string(), s);
        }
        assert!("critical".parse::<Severity>().is_err());
    }
}
