/*!
 * Local Store
 * Persistent key-value storage for browser-local state (session token, likes)
 */
pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub use file::DEFAULT_RETENTION_DAYS;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// String key-value storage. Reads never fail; a missing or unreadable key is `None`.
#[async_trait]
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Writes every pair, or none of them when the write fails.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_many(&[(key, value)]).await
    }
}

/// A view of another store with every key prefixed, one per visitor.
#[derive(Clone)]
pub struct ScopedStore {
    inner: Arc<dyn LocalStore>,
    prefix: String,
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn LocalStore>, scope: &str) -> Self {
        Self {
            inner,
            prefix: format!("{}:", scope),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl LocalStore for ScopedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(&self.scoped(key))
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let keys: Vec<String> = entries.iter().map(|(key, _)| self.scoped(key)).collect();
        let scoped: Vec<(&str, &str)> = keys
            .iter()
            .map(String::as_str)
            .zip(entries.iter().map(|(_, value)| *value))
            .collect();
        self.inner.set_many(&scoped).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.scoped(key)).await
    }
}
