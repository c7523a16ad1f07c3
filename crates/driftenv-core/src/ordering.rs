//! Deterministic orders for entry and drift listings
//!
//! Each order is a comparator applied with the stable `slice::sort_by`, so
//! items that compare equal keep their original relative order.

use std::cmp::Ordering;

use crate::drift::DriftedEntry;
use crate::entry::EnvEntry;

/// A total order over `T` used for report output
pub trait SortOrder<T> {
    fn compare(a: &T, b: &T) -> Ordering;

    /// Stable in-place sort
    fn sort(items: &mut [T]) {
        items.sort_by(Self::compare);
    }
}

/// Drift grouped by originating environment, ascending on the source label
pub struct DriftedEntriesBySource;

impl SortOrder<DriftedEntry> for DriftedEntriesBySource {
    fn compare(a: &DriftedEntry, b: &DriftedEntry) -> Ordering {
        a.source.source.cmp(&b.source.source)
    }
}

/// Entries by key, descending
pub struct EntriesByKey;

impl SortOrder<EnvEntry> for EntriesByKey {
    fn compare(a: &EnvEntry, b: &EnvEntry) -> Ordering {
        b.key.cmp(&a.key)
    }
}

/// Entries by value length in bytes, longest first
pub struct EntriesByValueSize;

impl SortOrder<EnvEntry> for EntriesByValueSize {
    fn compare(a: &EnvEntry, b: &EnvEntry) -> Ordering {
        b.value.len().cmp(&a.value.len())
    }
}
