//! Browser backends and the service worker entry point.
//!
//! `sw.js` loads this module and forwards the worker's `install`,
//! `activate` and `fetch` events to [`OfflineWorker`].

use crate::cache::{CacheError, CacheResult, CacheStorage, CachedResponse};
use crate::config::CacheConfig;
use crate::network::{Network, NetworkError, NetworkResult};
use crate::shell::{OfflineShell, SEC_FETCH_MODE, Strategy};
use crate::BoxFuture;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode};
use js_sys::{Array, Object, Promise, Uint8Array};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Cache, Headers, RequestInit, RequestMode, ResponseInit, WorkerGlobalScope};

fn worker_scope() -> Result<WorkerGlobalScope, JsValue> {
    js_sys::global().dyn_into::<WorkerGlobalScope>()
}

async fn resolve(promise: Promise) -> Result<JsValue, JsValue> {
    JsFuture::from(promise).await
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn cache_error(context: &str, e: JsValue) -> CacheError {
    CacheError::Other(format!("{}: {:?}", context, e))
}

fn header_map(headers: &Headers) -> HeaderMap {
    let mut map = HeaderMap::new();
    let Ok(Some(entries)) = js_sys::try_iter(headers.as_ref()) else {
        return map;
    };
    for entry in entries.flatten() {
        let pair = Array::from(&entry);
        let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) else {
            continue;
        };
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            map.append(name, value);
        }
    }
    map
}

fn web_headers(map: &HeaderMap) -> Result<Headers, JsValue> {
    let headers = Headers::new()?;
    for (name, value) in map {
        if let Ok(value) = value.to_str() {
            headers.append(name.as_str(), value)?;
        }
    }
    Ok(headers)
}

/// Convert a browser request; navigations are tagged with
/// `sec-fetch-mode: navigate` since workers cannot read that header.
fn to_http_request(request: &web_sys::Request) -> Result<Request<()>, JsValue> {
    let mut headers = header_map(&request.headers());
    if request.mode() == RequestMode::Navigate {
        headers.insert(SEC_FETCH_MODE, HeaderValue::from_static("navigate"));
    }
    let mut builder = Request::builder()
        .method(request.method().as_str())
        .uri(request.url());
    if let Some(target) = builder.headers_mut() {
        *target = headers;
    }
    builder.body(()).map_err(js_error)
}

async fn from_web_response(response: &web_sys::Response) -> Result<Response<Bytes>, JsValue> {
    let buffer = resolve(response.array_buffer()?).await?;
    let mut converted = Response::new(Bytes::from(Uint8Array::new(&buffer).to_vec()));
    *converted.status_mut() = StatusCode::from_u16(response.status()).map_err(js_error)?;
    *converted.headers_mut() = header_map(&response.headers());
    Ok(converted)
}

fn to_web_response(response: &Response<Bytes>) -> Result<web_sys::Response, JsValue> {
    let init = ResponseInit::new();
    init.set_status(response.status().as_u16());
    init.set_headers(&web_headers(response.headers())?);

    if response.body().is_empty() {
        return web_sys::Response::new_with_opt_buffer_source_and_init(None, &init);
    }
    let body = Uint8Array::from(response.body().as_ref());
    let body: &Object = &body;
    web_sys::Response::new_with_opt_buffer_source_and_init(Some(body), &init)
}

/// The worker's `caches` object.
pub struct BrowserCaches {
    storage: web_sys::CacheStorage,
}

impl BrowserCaches {
    pub fn new(scope: &WorkerGlobalScope) -> Result<Self, JsValue> {
        Ok(Self {
            storage: scope.caches()?,
        })
    }

    async fn cache(&self, name: &str) -> CacheResult<Cache> {
        let cache = resolve(self.storage.open(name))
            .await
            .map_err(|e| cache_error("Open error", e))?;
        cache
            .dyn_into::<Cache>()
            .map_err(|e| cache_error("Not a cache", e))
    }
}

impl CacheStorage for BrowserCaches {
    fn open(&self, cache: &str) -> BoxFuture<'_, CacheResult<()>> {
        let cache = cache.to_string();
        Box::pin(async move { self.cache(&cache).await.map(|_| ()) })
    }

    fn match_in(&self, cache: &str, key: &str) -> BoxFuture<'_, CacheResult<Option<CachedResponse>>> {
        let cache = cache.to_string();
        let key = key.to_string();
        Box::pin(async move {
            // Opening would create the cache, so check first.
            let exists = resolve(self.storage.has(&cache))
                .await
                .map_err(|e| cache_error("Has error", e))?;
            if !exists.is_truthy() {
                return Ok(None);
            }

            let found = resolve(self.cache(&cache).await?.match_with_str(&key))
                .await
                .map_err(|e| cache_error("Match error", e))?;
            if found.is_undefined() {
                return Ok(None);
            }
            let response: web_sys::Response = found
                .dyn_into()
                .map_err(|e| cache_error("Not a response", e))?;
            let response = from_web_response(&response)
                .await
                .map_err(|e| cache_error("Read error", e))?;
            Ok(Some(CachedResponse::from_response(&response)))
        })
    }

    fn put(&self, cache: &str, key: &str, response: CachedResponse) -> BoxFuture<'_, CacheResult<()>> {
        let cache = cache.to_string();
        let key = key.to_string();
        Box::pin(async move {
            let response = to_web_response(&response.to_response())
                .map_err(|e| cache_error("Response error", e))?;
            resolve(self.cache(&cache).await?.put_with_str(&key, &response))
                .await
                .map_err(|e| cache_error("Put error", e))?;
            Ok(())
        })
    }

    fn keys(&self) -> BoxFuture<'_, CacheResult<Vec<String>>> {
        Box::pin(async move {
            let names = resolve(self.storage.keys())
                .await
                .map_err(|e| cache_error("Keys error", e))?;
            Ok(Array::from(&names)
                .iter()
                .filter_map(|name| name.as_string())
                .collect())
        })
    }

    fn delete(&self, cache: &str) -> BoxFuture<'_, CacheResult<bool>> {
        let cache = cache.to_string();
        Box::pin(async move {
            let deleted = resolve(self.storage.delete(&cache))
                .await
                .map_err(|e| cache_error("Delete error", e))?;
            Ok(deleted.is_truthy())
        })
    }
}

/// Live fetches through the worker's global `fetch`.
pub struct BrowserNetwork {
    scope: WorkerGlobalScope,
}

impl BrowserNetwork {
    pub fn new(scope: WorkerGlobalScope) -> Self {
        Self { scope }
    }
}

impl Network for BrowserNetwork {
    fn fetch<'a>(&'a self, request: &'a Request<()>) -> BoxFuture<'a, NetworkResult<Response<Bytes>>> {
        Box::pin(async move {
            let url = request.uri().to_string();
            let failed = |e: JsValue| NetworkError::Failed {
                url: url.clone(),
                reason: format!("{:?}", e),
            };

            let init = RequestInit::new();
            init.set_method(request.method().as_str());
            init.set_headers(&web_headers(request.headers()).map_err(failed)?);
            let web_request = web_sys::Request::new_with_str_and_init(&url, &init).map_err(failed)?;

            // `fetch` only rejects when the request never got an answer.
            let response = resolve(self.scope.fetch_with_request(&web_request))
                .await
                .map_err(|_| NetworkError::Offline)?;
            let response: web_sys::Response = response.dyn_into().map_err(failed)?;
            from_web_response(&response).await.map_err(failed)
        })
    }
}

type BrowserShell = OfflineShell<BrowserCaches, BrowserNetwork>;

/// Service worker entry point.
#[wasm_bindgen]
pub struct OfflineWorker {
    shell: Rc<BrowserShell>,
}

#[wasm_bindgen]
impl OfflineWorker {
    /// Build the shell from the worker script's query string.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<OfflineWorker, JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&js_error(format!("Logger unavailable: {}", e)));
        }

        let scope = worker_scope()?;
        let config = CacheConfig::default().with_query(&scope.location().search());
        log::info!(
            "Offline shell {} with {} precached URLs",
            config.static_cache(),
            config.precache.len()
        );

        let caches = BrowserCaches::new(&scope)?;
        Ok(Self {
            shell: Rc::new(OfflineShell::new(config, caches, BrowserNetwork::new(scope))),
        })
    }

    /// Whether `fetch` answers this request. Other requests should be left
    /// to the browser.
    pub fn handles(&self, request: &web_sys::Request) -> bool {
        to_http_request(request)
            .is_ok_and(|request| self.shell.strategy(&request) != Strategy::PassThrough)
    }

    /// Precache the configured URLs. Resolves to the number cached.
    pub fn install(&self) -> Promise {
        let shell = self.shell.clone();
        future_to_promise(async move {
            let count = shell.install().await.map_err(js_error)?;
            Ok(JsValue::from(count as u32))
        })
    }

    /// Delete caches from older versions. Resolves to the number deleted.
    pub fn activate(&self) -> Promise {
        let shell = self.shell.clone();
        future_to_promise(async move {
            let deleted = shell.activate().await.map_err(js_error)?;
            Ok(JsValue::from(deleted.len() as u32))
        })
    }

    /// Resolves to a `Response`, or `undefined` when the request passes
    /// through.
    pub fn fetch(&self, request: web_sys::Request) -> Promise {
        let shell = self.shell.clone();
        future_to_promise(async move {
            let request = to_http_request(&request)?;
            match shell.handle(&request).await {
                Some(response) => to_web_response(&response).map(JsValue::from),
                None => Ok(JsValue::UNDEFINED),
            }
        })
    }
}
