use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::client::{parse, ApiClient};
use super::error::ApiError;
use super::request::ApiRequest;

struct Entry {
    value: Value,
    fetched_at: Instant,
}

/// Time-based cache for public reads. Only successful, unauthenticated GETs are stored;
/// a zero window disables caching.
pub struct RevalidateCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl RevalidateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn cacheable(&self, req: &ApiRequest) -> bool {
        !self.ttl.is_zero() && req.is_get() && !req.auth
    }

    pub async fn get_or_fetch(
        &self,
        client: &ApiClient,
        req: &ApiRequest,
    ) -> Result<Value, ApiError> {
        if !self.cacheable(req) {
            return client.send(req).await;
        }

        let key = req.target();
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if entry.fetched_at.elapsed() < self.ttl {
                    tracing::debug!(path = %key, "revalidate cache hit");
                    return Ok(entry.value.clone());
                }
            }
        }

        let value = client.send(req).await?;
        self.entries.write().await.insert(
            key,
            Entry {
                value: value.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(value)
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        client: &ApiClient,
        req: &ApiRequest,
        resource: &'static str,
    ) -> Result<T, ApiError> {
        let value = self.get_or_fetch(client, req).await?;
        parse(value, resource)
    }

    /// Drops every entry, after a mutation that public pages should reflect.
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        if !entries.is_empty() {
            tracing::debug!(entries = entries.len(), "revalidate cache cleared");
        }
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
