//! Request routing for the offline cache shell.
//!
//! Only GET requests are answered. Page navigations go to the network
//! first and fall back to the cache; assets under the static prefix come
//! from the cache first and are fetched once on a miss. Everything else is
//! left to the browser.

use crate::cache::{CacheError, CacheResult, CacheStorage, CachedResponse};
use crate::config::CacheConfig;
use crate::network::{get_request, request_key, Network};
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderValue, Method, Request, Response, StatusCode};

/// Header browsers set on page navigations.
pub(crate) const SEC_FETCH_MODE: &str = "sec-fetch-mode";

/// How a request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NetworkFirst,
    CacheFirst,
    PassThrough,
}

/// Whether a request is a full page load.
pub fn is_navigation(request: &Request<()>) -> bool {
    let headers = request.headers();
    if let Some(mode) = headers.get(SEC_FETCH_MODE) {
        return mode == "navigate";
    }
    headers
        .get(ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Synthesised answer when nothing else is available.
pub fn offline_response() -> Response<Bytes> {
    let mut response = Response::new(Bytes::from_static(b"Offline"));
    *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

/// Versioned cache shell over a cache backend and the network.
pub struct OfflineShell<C: CacheStorage, N: Network> {
    config: CacheConfig,
    caches: C,
    network: N,
}

impl<C: CacheStorage, N: Network> OfflineShell<C, N> {
    pub fn new(config: CacheConfig, caches: C, network: N) -> Self {
        Self {
            config,
            caches,
            network,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn caches(&self) -> &C {
        &self.caches
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Fetch every precache URL into the static cache.
    ///
    /// Fails on the first URL that cannot be fetched successfully.
    pub async fn install(&self) -> CacheResult<usize> {
        let cache = self.config.static_cache();
        self.caches.open(&cache).await?;

        for url in &self.config.precache {
            let request = get_request(url).map_err(|e| CacheError::Precache {
                url: url.clone(),
                reason: e.to_string(),
            })?;
            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| CacheError::Precache {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
            if !response.status().is_success() {
                return Err(CacheError::Precache {
                    url: url.clone(),
                    reason: format!("status {}", response.status()),
                });
            }
            self.caches
                .put(&cache, &request_key(&request), CachedResponse::from_response(&response))
                .await?;
        }

        log::info!("Precached {} entries into {}", self.config.precache.len(), cache);
        Ok(self.config.precache.len())
    }

    /// Delete every cache that is not part of the current version.
    ///
    /// Returns the names of the deleted caches.
    pub async fn activate(&self) -> CacheResult<Vec<String>> {
        let active = self.config.active_caches();
        let mut deleted = Vec::new();
        for name in self.caches.keys().await? {
            if active.contains(&name) {
                continue;
            }
            if self.caches.delete(&name).await? {
                log::info!("Deleted stale cache {}", name);
                deleted.push(name);
            }
        }
        Ok(deleted)
    }

    /// Decide how a request is served.
    pub fn strategy(&self, request: &Request<()>) -> Strategy {
        if request.method() != Method::GET {
            Strategy::PassThrough
        } else if is_navigation(request) {
            Strategy::NetworkFirst
        } else if self.config.is_static_path(request.uri().path()) {
            Strategy::CacheFirst
        } else {
            Strategy::PassThrough
        }
    }

    /// Answer a request, or `None` to let it through untouched.
    pub async fn handle(&self, request: &Request<()>) -> Option<Response<Bytes>> {
        match self.strategy(request) {
            Strategy::NetworkFirst => Some(self.network_first(request).await),
            Strategy::CacheFirst => Some(self.cache_first(request).await),
            Strategy::PassThrough => None,
        }
    }

    async fn network_first(&self, request: &Request<()>) -> Response<Bytes> {
        let key = request_key(request);
        match self.network.fetch(request).await {
            Ok(response) => {
                if response.status().is_success() {
                    let cached = CachedResponse::from_response(&response);
                    if let Err(e) = self.caches.put(&self.config.pages_cache(), &key, cached).await {
                        log::warn!("Could not cache page {}: {}", key, e);
                    }
                }
                response
            }
            Err(e) => {
                log::warn!("Navigation to {} failed: {}", key, e);
                if let Some(cached) = self.lookup(&key).await {
                    return cached.to_response();
                }
                let offline_key = get_request(&self.config.offline_page)
                    .map(|request| request_key(&request))
                    .unwrap_or_else(|_| self.config.offline_page.clone());
                if let Some(offline) = self.lookup(&offline_key).await {
                    return offline.to_response();
                }
                offline_response()
            }
        }
    }

    async fn cache_first(&self, request: &Request<()>) -> Response<Bytes> {
        let key = request_key(request);
        if let Some(cached) = self.lookup(&key).await {
            return cached.to_response();
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.status().is_success() {
                    let cached = CachedResponse::from_response(&response);
                    if let Err(e) = self.caches.put(&self.config.static_cache(), &key, cached).await {
                        log::warn!("Could not cache asset {}: {}", key, e);
                    }
                }
                response
            }
            Err(e) => {
                log::warn!("Asset {} unavailable: {}", key, e);
                offline_response()
            }
        }
    }

    /// Look a key up in the current caches, static first.
    async fn lookup(&self, key: &str) -> Option<CachedResponse> {
        for cache in self.config.active_caches() {
            match self.caches.match_in(&cache, key).await {
                Ok(Some(hit)) => return Some(hit),
                Ok(None) => {}
                Err(e) => log::warn!("Cache lookup in {} failed: {}", cache, e),
            }
        }
        None
    }
}
