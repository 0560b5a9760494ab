//! Store lookup with dual-key fallback.

use subkv_types::{ConfigName, StoreError};
use tracing::debug;

use crate::keys::candidate_keys;
use crate::store::KvStore;

/// A stored value together with the key it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub key: String,
    pub raw: String,
}

/// Look `name` up verbatim, then percent-encoded.
///
/// Empty values count as absent. Returns `Ok(None)` when no candidate
/// resolves; a store fault aborts the lookup.
pub async fn resolve(
    store: &dyn KvStore,
    name: &ConfigName,
) -> Result<Option<ResolvedEntry>, StoreError> {
    for key in candidate_keys(name) {
        match store.get(&key).await? {
            Some(raw) if !raw.is_empty() => {
                debug!("Resolved {} under key {}", name, key);
                return Ok(Some(ResolvedEntry { key, raw }));
            },
            _ => debug!("No value under key {}", key),
        }
    }
    Ok(None)
}
