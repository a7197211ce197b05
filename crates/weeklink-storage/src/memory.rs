use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use weeklink_core::error::Result;
use weeklink_core::KeyValueStore;

/// In-memory implementation of [`KeyValueStore`] using DashMap.
///
/// Values live as long as the store does. Useful for tests and for hosts
/// that do not need persistence across restarts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    storage: DashMap<String, Value>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self {
            storage: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.storage.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.storage.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn get_missing_key() {
        let store = InMemoryStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = InMemoryStore::new();
        store.set("k", json!([1, 2, 3])).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!([1, 2, 3])));
    }

    #[tokio::test]
    async fn set_replaces_value() {
        let store = InMemoryStore::with_entries([("k", json!("old"))]);
        store.set("k", json!("new")).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!("new")));
    }

    #[tokio::test]
    async fn concurrent_access() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryStore::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.set(&format!("key-{i:03}"), json!(i)).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let value = store.get(&format!("key-{i:03}")).await.unwrap();
            assert_eq!(value, Some(json!(i)));
        }
    }
}
