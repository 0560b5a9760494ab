use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;
use subkv_types::{ConfigError, KeyEntry, StoreError};

use super::KvStore;

/// In-process store, used for local serving and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        for (key, value) in entries {
            store.insert(key, value);
        }
        store
    }

    /// Load a seed file: a JSON object mapping store key to stored value.
    ///
    /// String values are stored as-is; any other JSON value (normally an
    /// envelope object) is stored as its serialized JSON text.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::from_io_error(path.display().to_string(), &e))?;
        let seed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))?;

        let store = Self::new();
        for (key, value) in seed {
            let raw = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            store.insert(key, raw);
        }
        tracing::info!("Seeded memory store with {} entries from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn list(&self) -> Result<Vec<KeyEntry>, StoreError> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        Ok(names.into_iter().map(KeyEntry::new).collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_get_and_list() {
        let store = MemoryStore::from_entries([("b", "2"), ("a", "1")]);
        assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
        assert_eq!(store.get("c").await.unwrap(), None);

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_from_json_file_serializes_objects() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"myconf": {{"myconf": "aGVsbG8=", "headers": {{}}}}, "plain": "text"}}"#
        )
        .unwrap();

        let store = MemoryStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("plain").await.unwrap(), Some("text".to_string()));

        let raw = store.get("myconf").await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["myconf"], "aGVsbG8=");
    }

    #[test]
    fn test_from_json_file_rejects_non_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let err = MemoryStore::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
