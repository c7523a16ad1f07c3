//! Resolved key/value entries

use serde::{Deserialize, Serialize};

use crate::keypath::Severity;

const MASK: &str = "*****";

/// One resolved key/value fact with its provenance and display policy
///
/// Values are stored unredacted; [`EnvEntry::redacted`] applies the
/// severity policy at display time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
    /// Name of the provider instance that produced the entry
    pub provider_name: String,
    /// Backend kind of that provider
    pub provider: String,
    pub resolved_path: String,
    pub severity: Severity,
    pub redact_with: String,
    pub source: String,
    pub sink: String,
}

impl EnvEntry {
    /// Value as it should be displayed for this entry's severity
    ///
    /// - `high`: the `redact_with` placeholder
    /// - `medium`: first 2 characters, then a mask
    /// - `low`: first 4 characters, then a mask
    /// - `none`: the raw value
    pub fn redacted(&self) -> String {
        match self.severity {
            Severity::High => self.redact_with.clone(),
            Severity::Medium => masked(&self.value, 2),
            Severity::Low => masked(&self.value, 4),
            Severity::None => self.value.clone(),
        }
    }

    /// True when the entry carries a value worth protecting
    pub fn is_sensitive(&self) -> bool {
        self.severity != Severity::None && !self.value.is_empty()
    }
}

fn masked(value: &str, keep: usize) -> String {
    let prefix: String = value.chars().take(keep).collect();
    format!("{}{}", prefix, MASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(value: &str, severity: Severity) -> EnvEntry {
        EnvEntry {
            key: "TOKEN".into(),
            value: value.into(),
            provider_name: "mem".into(),
            provider: "memory".into(),
            resolved_path: "app/token".into(),
            severity,
            redact_with: "**REDACTED**".into(),
            source: String::new(),
            sink: String::new(),
        }
    }

    #[rstest]
    #[case(Severity::High, "abcdefgh", "**REDACTED**")]
    #[case(Severity::Medium, "abcdefgh", "ab*****")]
    #[case(Severity::Low, "abcdefgh", "abcd*****")]
    #[case(Severity::None, "abcdefgh", "abcdefgh")]
    #[case(Severity::Medium, "a", "a*****")]
    #[case(Severity::Low, "", "*****")]
    fn test_redacted_by_severity(
        #[case] severity: Severity,
        #[case] value: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(entry(value, severity).redacted(), expected);
    }

    #[test]
    fn test_redacted_respects_char_boundaries() {
        assert_eq!(entry("ñöxyz", Severity::Medium).redacted(), "ñö*****");
    }

    #[test]
    fn test_is_sensitive() {
        assert!(entry("x", Severity::Low).is_sensitive());
        assert!(!entry("x", Severity::None).is_sensitive());
        assert!(!entry("", Severity::High).is_sensitive());
    }
}
