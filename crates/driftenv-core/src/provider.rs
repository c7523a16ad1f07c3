//! Provider trait: the capability contract every backend implements

use async_trait::async_trait;

use crate::Result;
use crate::entry::EnvEntry;
use crate::keypath::KeyPath;

/// A secrets/configuration backend
///
/// Implementations resolve [`KeyPath`]s into [`EnvEntry`] values and write
/// values back. Absence of a value is an error unless the key path is
/// `optional`, in which case `get` returns `Ok(None)` and `get_mapping`
/// returns an empty list.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Instance name, recorded as `provider_name` on produced entries
    fn name(&self) -> &str;

    /// Backend kind, recorded as `provider` on produced entries
    fn kind(&self) -> &str;

    /// Expand one locator into many entries (`env` is empty)
    ///
    /// Each entry's `resolved_path` names the concrete sub-path it came from
    /// and its key is renamed through the key path's `remap` table.
    async fn get_mapping(&self, key_path: &KeyPath) -> Result<Vec<EnvEntry>>;

    /// Resolve one scalar value for a key path with `env` set
    ///
    /// When `decrypt` is requested the returned value is plaintext.
    async fn get(&self, key_path: &KeyPath) -> Result<Option<EnvEntry>>;

    /// Write `value` at the key path's location
    async fn put(&self, key_path: &KeyPath, value: &str) -> Result<()>;
}
