use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::sync::Mutex;

use super::{LocalStore, StoreError};

/// Entries not written for this long are dropped.
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    value: String,
    touched: DateTime<Utc>,
}

type Entries = HashMap<String, Entry>;

/// JSON-file backed store. The whole map is rewritten on every mutation,
/// through a temp file and rename so a crash never leaves a torn file.
///
/// Writers are serialised; the in-memory map is only replaced after the
/// file write succeeds, so readers never see a value that was not persisted.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    retention: Duration,
    entries: RwLock<Entries>,
    writer: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `path` with the default retention.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_retention(path, Duration::days(DEFAULT_RETENTION_DAYS)).await
    }

    /// Opens the store at `path`, creating parent directories. A missing file is an empty store.
    /// Entries older than `retention` are dropped on load.
    pub async fn open_with_retention(
        path: impl AsRef<Path>,
        retention: Duration,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut entries: Entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        let expired = prune(&mut entries, Utc::now(), retention);

        tracing::debug!(
            path = %path.display(),
            keys = entries.len(),
            expired,
            "local store opened"
        );

        Ok(Self {
            path,
            retention,
            entries: RwLock::new(entries),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn snapshot(&self) -> Result<Entries, StoreError> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .clone())
    }

    fn replace(&self, next: Entries) -> Result<(), StoreError> {
        *self.entries.write().map_err(|_| StoreError::Poisoned)? = next;
        Ok(())
    }

    /// Applies `change` to a copy of the map, persists it, then swaps it in.
    /// `change` returns whether it modified anything.
    async fn commit<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Entries, DateTime<Utc>) -> bool + Send,
    {
        let _writer = self.writer.lock().await;
        let now = Utc::now();
        let mut next = self.snapshot()?;
        let changed = change(&mut next, now);
        let expired = prune(&mut next, now, self.retention);
        if !changed && expired == 0 {
            return Ok(());
        }

        self.flush(&next).await?;
        self.replace(next)?;
        if expired > 0 {
            tracing::debug!(expired, "expired local store entries");
        }
        Ok(())
    }

    async fn flush(&self, entries: &Entries) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Drops entries last written more than `retention` ago. Returns how many were dropped.
fn prune(entries: &mut Entries, now: DateTime<Utc>, retention: Duration) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| now - entry.touched <= retention);
    before - entries.len()
}

#[async_trait]
impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if Utc::now() - entry.touched > self.retention {
            return None;
        }
        Some(entry.value.clone())
    }

    async fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), StoreError> {
        self.commit(|entries, now| {
            for (key, value) in pairs {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: value.to_string(),
                        touched: now,
                    },
                );
            }
            !pairs.is_empty()
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.commit(|entries, _| entries.remove(key).is_some()).await
    }
}
