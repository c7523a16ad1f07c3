//! Drift detection between two resolved snapshots
//!
//! Entries are paired by identity `(label, key)`. A source-side entry is
//! labeled by its `source`; a target-side entry is labeled by its `sink`,
//! or by its `source` when no sink is set. Source entries without a
//! counterpart are reported as [`DriftKind::Missing`]; target entries
//! without a counterpart are skipped.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use crate::entry::EnvEntry;
use crate::error::{Error, Result};
use crate::lookup::EnvEntryLookup;
use crate::ordering::{DriftedEntriesBySource, SortOrder};

/// Diff text recorded for a source entry with no target counterpart
pub const MISSING_DIFF: &str = "missing";

/// Type of drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftKind {
    /// Both sides hold the key with different values
    Changed,
    /// The key exists in the source but not in the target
    Missing,
}

impl std::fmt::Display for DriftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Changed => write!(f, "changed"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// A difference between a source entry and its target counterpart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftedEntry {
    /// Line-level diff from source value to target value
    pub diff: String,
    pub kind: DriftKind,
    pub source: EnvEntry,
    /// `None` for [`DriftKind::Missing`]
    pub target: Option<EnvEntry>,
}

impl DriftedEntry {
    /// Pair two entries, or `None` when their values are equal
    pub fn changed(source: &EnvEntry, target: &EnvEntry) -> Option<Self> {
        if source.value == target.value {
            return None;
        }
        Some(Self {
            diff: value_diff(&source.value, &target.value),
            kind: DriftKind::Changed,
            source: source.clone(),
            target: Some(target.clone()),
        })
    }

    pub fn missing(source: &EnvEntry) -> Self {
        Self {
            diff: MISSING_DIFF.to_string(),
            kind: DriftKind::Missing,
            source: source.clone(),
            target: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.source.key
    }

    pub fn label(&self) -> &str {
        source_label(&self.source)
    }
}

/// Line-level diff between two values, one `-`/`+`/` ` prefixed line per change
pub fn value_diff(old: &str, new: &str) -> String {
    let text_diff = TextDiff::from_lines(old, new);
    let mut out = String::new();

    for change in text_diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        out.push(sign);
        out.push_str(change.value());
        if change.missing_newline() {
            out.push('\n');
        }
    }

    out
}

fn source_label(entry: &EnvEntry) -> &str {
    &entry.source
}

fn target_label(entry: &EnvEntry) -> &str {
    if entry.sink.is_empty() {
        &entry.source
    } else {
        &entry.sink
    }
}

type Identity<'a> = (&'a str, &'a str);

/// Compares source and target snapshots
///
/// In strict mode an identity that appears more than once on either side
/// is an [`Error::AmbiguousMatch`]; otherwise every target candidate is
/// compared against the source entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriftEngine {
    strict: bool,
}

impl DriftEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Drifted entries between `source` and `target`, sorted by source label
    pub fn compare(
        &self,
        source: &EnvEntryLookup,
        target: &EnvEntryLookup,
    ) -> Result<Vec<DriftedEntry>> {
        if self.strict {
            ensure_unique(source, source_label)?;
            ensure_unique(target, target_label)?;
        }
        Ok(drift(source, target))
    }
}

fn ensure_unique(lookup: &EnvEntryLookup, label: fn(&EnvEntry) -> &str) -> Result<()> {
    let mut counts: HashMap<Identity<'_>, usize> = HashMap::new();
    for entry in lookup {
        *counts.entry((label(entry), entry.key.as_str())).or_default() += 1;
    }

    // Report the first duplicate in stored order so the error is stable
    for entry in lookup {
        let id = (label(entry), entry.key.as_str());
        let count = counts.get(&id).copied().unwrap_or_default();
        if count > 1 {
            return Err(Error::AmbiguousMatch {
                label: id.0.to_string(),
                key: id.1.to_string(),
                count,
            });
        }
    }
    Ok(())
}

/// Lenient comparison; never fails
pub fn drift(source: &EnvEntryLookup, target: &EnvEntryLookup) -> Vec<DriftedEntry> {
    let mut targets: HashMap<Identity<'_>, Vec<&EnvEntry>> = HashMap::new();
    for entry in target {
        targets
            .entry((target_label(entry), entry.key.as_str()))
            .or_default()
            .push(entry);
    }

    let mut drifts = Vec::new();
    let mut matched: HashSet<Identity<'_>> = HashSet::new();

    for entry in source {
        let id = (source_label(entry), entry.key.as_str());
        match targets.get(&id) {
            Some(candidates) => {
                matched.insert(id);
                drifts.extend(
                    candidates
                        .iter()
                        .filter_map(|t| DriftedEntry::changed(entry, t)),
                );
            }
            None => {
                tracing::debug!(label = id.0, key = id.1, "no target counterpart");
                drifts.push(DriftedEntry::missing(entry));
            }
        }
    }

    for entry in target {
        let id = (target_label(entry), entry.key.as_str());
        if !matched.contains(&id) {
            tracing::debug!(label = id.0, key = id.1, "skipping target-only entry");
        }
    }

    DriftedEntriesBySource::sort(&mut drifts);
    drifts
}

/// Split one snapshot into its source-labeled and sink-labeled halves
///
/// Entries with a `source` label form the source side. Entries with only a
/// `sink` label form the target side. Unlabeled entries are dropped.
pub fn split_by_role(lookup: &EnvEntryLookup) -> (EnvEntryLookup, EnvEntryLookup) {
    let sources = lookup.filter(|e| !e.source.is_empty());
    let targets = lookup.filter(|e| e.source.is_empty() && !e.sink.is_empty());
    (sources, targets)
}
