//! Token Board Offline Shell
//!
//! A versioned cache layer for the page shell, independent of the board
//! logic. Runtime agnostic: backends return boxed futures, and requests and
//! responses are `http` types. On `wasm32` the crate also builds the
//! service worker module (`OfflineWorker`) loaded by `worker/sw.js`.

pub mod cache;
pub mod config;
pub mod network;
pub mod shell;

#[cfg(target_arch = "wasm32")]
mod web;

pub use cache::{CacheError, CacheResult, CacheStorage, CachedResponse, MemoryCacheStorage};
pub use config::CacheConfig;
pub use network::{Network, NetworkError, NetworkResult};
pub use shell::{OfflineShell, Strategy, is_navigation, offline_response};

#[cfg(target_arch = "wasm32")]
pub use web::{BrowserCaches, BrowserNetwork, OfflineWorker};

use std::future::Future;
use std::pin::Pin;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
