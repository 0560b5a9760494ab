//! Key-value store abstraction.
//!
//! The core only ever reads from the store; entries are produced elsewhere.

mod cloudflare;
mod memory;

pub use cloudflare::CloudflareKvStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::sync::Arc;
use subkv_types::{ConfigError, KeyEntry, StoreBackend, StoreError};

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Exact-match lookup. `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Enumerate all keys.
    async fn list(&self) -> Result<Vec<KeyEntry>, StoreError>;

    /// Short backend label for logs.
    fn backend_name(&self) -> &'static str;
}

/// Build the configured backend.
pub fn build_store(
    backend: &StoreBackend,
    http_client: reqwest::Client,
) -> Result<Arc<dyn KvStore>, ConfigError> {
    match backend {
        StoreBackend::Memory { seed_file: Some(path) } => {
            Ok(Arc::new(MemoryStore::from_json_file(path)?))
        },
        StoreBackend::Memory { seed_file: None } => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Cloudflare { account_id, namespace_id, api_token, base_url } => {
            Ok(Arc::new(CloudflareKvStore::new(
                http_client,
                base_url,
                account_id,
                namespace_id,
                api_token,
            )?))
        },
    }
}
