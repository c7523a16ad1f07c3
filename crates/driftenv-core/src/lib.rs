//! Environment resolution and drift detection for driftenv
//!
//! Key paths declare where values live in providers; providers resolve them
//! into entries; entries are gathered into snapshots; two snapshots are
//! compared to surface drift.

pub mod config;
pub mod drift;
pub mod entry;
pub mod error;
pub mod keypath;
pub mod lookup;
pub mod ordering;
pub mod provider;
pub mod redact;
pub mod resolve;
pub mod scan;

pub use config::{Declarations, Lookup, ProviderDeclaration};
pub use drift::{DriftEngine, DriftKind, DriftedEntry, drift, split_by_role, value_diff};
pub use entry::EnvEntry;
pub use error::{Error, Result};
pub use keypath::{DEFAULT_REDACT_WITH, KeyPath, Severity};
pub use lookup::EnvEntryLookup;
pub use ordering::{DriftedEntriesBySource, EntriesByKey, EntriesByValueSize, SortOrder};
pub use provider::Provider;
pub use redact::Redactor;
pub use resolve::Resolver;
pub use scan::{Match, scan, scan_file};
