//! Named response caches.

use crate::BoxFuture;
use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache not found: {0}")]
    NotFound(String),
    #[error("Precache of {url} failed: {reason}")]
    Precache { url: String, reason: String },
    #[error("Cache error: {0}")]
    Other(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// A stored response. `http::Response` is not `Clone`, so the parts are
/// kept separately.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    pub fn from_response(response: &Response<Bytes>) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            body: response.body().clone(),
        }
    }

    pub fn to_response(&self) -> Response<Bytes> {
        let mut response = Response::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

/// Trait for cache backends, modelled on the browser's `CacheStorage`.
///
/// Entries are keyed by request URL. Writes to the same key are
/// last-write-wins.
pub trait CacheStorage {
    /// Create the named cache if it does not exist.
    fn open(&self, cache: &str) -> BoxFuture<'_, CacheResult<()>>;

    /// Look up `key` in one cache.
    fn match_in(&self, cache: &str, key: &str) -> BoxFuture<'_, CacheResult<Option<CachedResponse>>>;

    /// Store a response, creating the cache if needed.
    fn put(&self, cache: &str, key: &str, response: CachedResponse) -> BoxFuture<'_, CacheResult<()>>;

    /// Names of every cache.
    fn keys(&self) -> BoxFuture<'_, CacheResult<Vec<String>>>;

    /// Delete a whole cache. Returns whether it existed.
    fn delete(&self, cache: &str) -> BoxFuture<'_, CacheResult<bool>>;
}

/// In-memory cache storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryCacheStorage {
    caches: RwLock<HashMap<String, HashMap<String, CachedResponse>>>,
    writes: RwLock<usize>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.read().map(|count| *count).unwrap_or(0)
    }
}

fn lock_error(e: impl std::fmt::Display) -> CacheError {
    CacheError::Other(format!("Lock error: {}", e))
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&self, cache: &str) -> BoxFuture<'_, CacheResult<()>> {
        let cache = cache.to_string();
        Box::pin(async move {
            let mut caches = self.caches.write().map_err(lock_error)?;
            caches.entry(cache).or_default();
            Ok(())
        })
    }

    fn match_in(&self, cache: &str, key: &str) -> BoxFuture<'_, CacheResult<Option<CachedResponse>>> {
        let cache = cache.to_string();
        let key = key.to_string();
        Box::pin(async move {
            let caches = self.caches.read().map_err(lock_error)?;
            Ok(caches.get(&cache).and_then(|entries| entries.get(&key)).cloned())
        })
    }

    fn put(&self, cache: &str, key: &str, response: CachedResponse) -> BoxFuture<'_, CacheResult<()>> {
        let cache = cache.to_string();
        let key = key.to_string();
        Box::pin(async move {
            let mut caches = self.caches.write().map_err(lock_error)?;
            caches.entry(cache).or_default().insert(key, response);
            if let Ok(mut writes) = self.writes.write() {
                *writes += 1;
            }
            Ok(())
        })
    }

    fn keys(&self) -> BoxFuture<'_, CacheResult<Vec<String>>> {
        Box::pin(async move {
            let caches = self.caches.read().map_err(lock_error)?;
            let mut names: Vec<String> = caches.keys().cloned().collect();
            names.sort();
            Ok(names)
        })
    }

    fn delete(&self, cache: &str) -> BoxFuture<'_, CacheResult<bool>> {
        let cache = cache.to_string();
        Box::pin(async move {
            let mut caches = self.caches.write().map_err(lock_error)?;
            Ok(caches.remove(&cache).is_some())
        })
    }
}
