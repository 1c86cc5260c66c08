//! # Key-Value Storage
//!
//! The device-local storage primitive everything else is built on: string
//! keys mapping to string values, with get/set/remove.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KeyValueStore                                      │
//! │                                                                         │
//! │   get_item(key)          set_item(key, value)       remove_item(key)   │
//! │        │                        │                          │            │
//! │        ├────────────────────────┼──────────────────────────┤            │
//! │        ▼                        ▼                          ▼            │
//! │  ┌──────────────────────┐            ┌──────────────────────────────┐  │
//! │  │ Database (pool.rs)   │            │ MemoryStore (this module)    │  │
//! │  │ kv_store table       │            │ RwLock<HashMap>              │  │
//! │  │ survives restarts    │            │ tests, throwaway sessions    │  │
//! │  └──────────────────────┘            └──────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::StoreResult;

/// Async string key-value storage.
///
/// Writes replace the whole value for a key; there are no partial updates.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> impl Future<Output = StoreResult<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> impl Future<Output = StoreResult<()>> + Send;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> impl Future<Output = StoreResult<()>> + Send;
}

/// In-memory [`KeyValueStore`].
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether no key is stored.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("@Products").await.unwrap(), None);

        store.set_item("@Products", "[]").await.unwrap();
        assert_eq!(store.get_item("@Products").await.unwrap().as_deref(), Some("[]"));

        store.set_item("@Products", "[1]").await.unwrap();
        assert_eq!(store.get_item("@Products").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        store.remove_item("@AuthToken").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set_item("@AuthToken", "abc").await.unwrap();
        assert_eq!(other.get_item("@AuthToken").await.unwrap().as_deref(), Some("abc"));
    }
}
