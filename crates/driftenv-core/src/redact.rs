//! Secret scrubbing for arbitrary text

use crate::entry::EnvEntry;
use crate::ordering::{EntriesByValueSize, SortOrder};

/// Replaces resolved secret values in text with their placeholders
///
/// Longer values are replaced first so a secret that contains another
/// secret is scrubbed as a whole.
#[derive(Debug, Clone)]
pub struct Redactor {
    entries: Vec<EnvEntry>,
}

impl Redactor {
    pub fn new<'a>(entries: impl IntoIterator<Item = &'a EnvEntry>) -> Self {
        let mut entries: Vec<EnvEntry> = entries
            .into_iter()
            .filter(|e| !e.value.is_empty())
            .cloned()
            .collect();
        EntriesByValueSize::sort(&mut entries);
        Self { entries }
    }

    /// Replace secrets in one left-to-right pass over `text`
    ///
    /// At each position the longest matching value wins. Inserted
    /// placeholders are never searched again.
    pub fn redact(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(ch) = rest.chars().next() {
            match self.entries.iter().find(|e| rest.starts_with(e.value.as_str())) {
                Some(entry) => {
                    out.push_str(&entry.redact_with);
                    rest = &rest[entry.value.len()..];
                }
                None => {
                    out.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        out
    }
}
