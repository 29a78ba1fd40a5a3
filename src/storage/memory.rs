//! In-process key-value store.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{KeyValueStore, StorageError};

/// A [`KeyValueStore`] that keeps values in memory.
///
/// Clones share the same map, so a "restart" can be simulated by building a
/// fresh tracker over a clone of the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, f32>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a single value.
    pub fn with_value(key: &str, value: f32) -> Self {
        let mut map = HashMap::new();
        map.insert(key.to_string(), value);
        Self {
            values: Arc::new(RwLock::new(map)),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_float(&self, key: &str) -> Result<Option<f32>, StorageError> {
        Ok(self.values.read().await.get(key).copied())
    }

    async fn set_float(&self, key: &str, value: f32) -> Result<(), StorageError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_float("k").await.unwrap(), None);

        store.set_float("k", 42.0).await.unwrap();
        assert_eq!(store.get_float("k").await.unwrap(), Some(42.0));

        store.remove("k").await.unwrap();
        assert_eq!(store.get_float("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_values() {
        let store = MemoryStore::with_value("k", 7.0);
        let other = store.clone();

        other.set_float("k", 8.0).await.unwrap();

        assert_eq!(store.get_float("k").await.unwrap(), Some(8.0));
    }
}
