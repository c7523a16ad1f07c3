//! In-memory index over a batch of resolved entries

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::entry::EnvEntry;

/// An ordered snapshot of resolved entries
///
/// Insertion order is preserved and duplicate keys are allowed. Every lookup
/// returns the first match in stored order, or the caller's default; lookups
/// never fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvEntryLookup {
    entries: Vec<EnvEntry>,
}

impl EnvEntryLookup {
    pub fn new(entries: Vec<EnvEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry while the snapshot is being assembled
    pub fn push(&mut self, entry: EnvEntry) {
        self.entries.push(entry);
    }

    /// Value for an exact (key, provider, resolved path) match
    pub fn env_by<'a>(
        &'a self,
        key: &str,
        provider: &str,
        path: &str,
        default: &'a str,
    ) -> &'a str {
        self.find(|e| e.key == key && e.provider_name == provider && e.resolved_path == path)
            .unwrap_or(default)
    }

    /// Value for the first entry with `key` produced by `provider`
    pub fn env_by_key_and_provider<'a>(
        &'a self,
        key: &str,
        provider: &str,
        default: &'a str,
    ) -> &'a str {
        self.find(|e| e.key == key && e.provider_name == provider)
            .unwrap_or(default)
    }

    /// Value for the first entry with `key`
    pub fn env_by_key<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.find(|e| e.key == key).unwrap_or(default)
    }

    fn find(&self, pred: impl Fn(&EnvEntry) -> bool) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| pred(*e))
            .map(|e| e.value.as_str())
    }

    pub fn entries(&self) -> &[EnvEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnvEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<EnvEntry> {
        self.entries
    }

    /// New snapshot holding the entries that satisfy `pred`, in order
    pub fn filter(&self, pred: impl Fn(&EnvEntry) -> bool) -> Self {
        self.entries.iter().filter(|e| pred(*e)).cloned().collect()
    }

    /// Entries stably sorted by `compare`, e.g. [`crate::ordering::EntriesByKey`]
    pub fn sorted_by(&self, compare: impl FnMut(&EnvEntry, &EnvEntry) -> Ordering) -> Vec<EnvEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(compare);
        entries
    }
}

impl FromIterator<EnvEntry> for EnvEntryLookup {
    fn from_iter<I: IntoIterator<Item = EnvEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<EnvEntry> for EnvEntryLookup {
    fn extend<I: IntoIterator<Item = EnvEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<'a> IntoIterator for &'a EnvEntryLookup {
    type Item = &'a EnvEntry;
    type IntoIter = std::slice::Iter<'a, EnvEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
