//! Cache shell configuration.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Versioned cache layout.
///
/// Bumping `version` renames both caches; `activate` then deletes the old
/// ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Shared prefix of every cache name this shell owns.
    pub prefix: String,
    pub version: String,
    /// Request paths under this prefix are served cache-first.
    pub static_prefix: String,
    /// Page served when a navigation fails and nothing better is cached.
    pub offline_page: String,
    /// URLs fetched into the static cache on install.
    pub precache: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: "fg-trainer".to_string(),
            version: "v1".to_string(),
            static_prefix: "/static/".to_string(),
            offline_page: "/".to_string(),
            precache: vec![
                "/".to_string(),
                "/static/pwa/manifest.json".to_string(),
                "/static/pwa/ff-icon-192.png".to_string(),
                "/static/pwa/ff-icon-512.png".to_string(),
            ],
        }
    }
}

impl CacheConfig {
    /// Parse a config from JSON, falling back to defaults on malformed input.
    pub fn from_json_or_default(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed cache config: {}", e);
            Self::default()
        })
    }

    /// Apply the page's overrides from the worker script's query string,
    /// e.g. `?offline=%2Foffline&manifest=%2Fstatic%2Fpwa%2Fmanifest.json`.
    ///
    /// Values are form-decoded. `offline` replaces the offline page; every
    /// recognised URL is added to the precache list once.
    pub fn with_query(mut self, query: &str) -> Self {
        let query = query.trim_start_matches('?');
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "offline" => {
                    self.offline_page = value.to_string();
                    self.add_precache(&value);
                }
                "manifest" | "icon192" | "icon512" => self.add_precache(&value),
                _ => {}
            }
        }
        self
    }

    fn add_precache(&mut self, url: &str) {
        if !self.precache.iter().any(|existing| existing == url) {
            self.precache.push(url.to_string());
        }
    }

    /// Name of the cache-first asset cache.
    pub fn static_cache(&self) -> String {
        format!("{}-static-{}", self.prefix, self.version)
    }

    /// Name of the network-first page cache.
    pub fn pages_cache(&self) -> String {
        format!("{}-pages-{}", self.prefix, self.version)
    }

    /// Caches that survive activation.
    pub fn active_caches(&self) -> [String; 2] {
        [self.static_cache(), self.pages_cache()]
    }

    /// Whether a request path is served cache-first.
    pub fn is_static_path(&self, path: &str) -> bool {
        !self.static_prefix.is_empty() && path.starts_with(&self.static_prefix)
    }
}
