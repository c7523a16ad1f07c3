//! Bundled providers for driftenv.
//!
//! Cloud and vault backends live outside this workspace; this crate ships
//! the in-memory provider used in tests and a provider over a local
//! document file.

pub mod decrypt;
pub mod document;
pub mod file;
pub mod memory;
pub mod registry;

pub use decrypt::{DecryptError, Decryptor};
pub use document::{Document, SecretNode};
pub use file::{DocumentFormat, FILE_KIND, FileProvider};
pub use memory::{MEMORY_KIND, MemoryProvider};
pub use registry::{build_provider, resolver_for};
