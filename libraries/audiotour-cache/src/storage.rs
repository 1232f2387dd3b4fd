//! Named response caches
//!
//! In-memory equivalent of the browser's `CacheStorage`: a set of named
//! caches, each mapping a URL to a stored response. Cloning shares the
//! underlying storage.

use crate::types::CacheResponse;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

type NamedCache = BTreeMap<String, CacheResponse>;

#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: Arc<RwLock<BTreeMap<String, NamedCache>>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the cache `name` if it does not exist
    pub async fn open(&self, name: &str) {
        self.caches
            .write()
            .await
            .entry(name.to_string())
            .or_default();
    }

    /// Store `response` for `url` in cache `name`, creating the cache if needed
    pub async fn put(&self, name: &str, url: &Url, response: CacheResponse) {
        self.caches
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    /// Look `url` up in cache `name`
    pub async fn match_in(&self, name: &str, url: &Url) -> Option<CacheResponse> {
        self.caches
            .read()
            .await
            .get(name)
            .and_then(|cache| cache.get(url.as_str()))
            .cloned()
    }

    /// Look `url` up in every cache, in name order
    pub async fn match_any(&self, url: &Url) -> Option<CacheResponse> {
        self.caches
            .read()
            .await
            .values()
            .find_map(|cache| cache.get(url.as_str()))
            .cloned()
    }

    /// Names of all caches
    pub async fn keys(&self) -> Vec<String> {
        self.caches.read().await.keys().cloned().collect()
    }

    /// Delete cache `name`; returns whether it existed
    pub async fn delete(&self, name: &str) -> bool {
        self.caches.write().await.remove(name).is_some()
    }

    /// Number of entries in cache `name`
    pub async fn len(&self, name: &str) -> usize {
        self.caches
            .read()
            .await
            .get(name)
            .map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self, name: &str) -> bool {
        self.len(name).await == 0
    }
}
