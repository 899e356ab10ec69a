//! The live network, as seen by the cache shell.

use crate::BoxFuture;
use bytes::Bytes;
use http::{Request, Response};
use thiserror::Error;

/// Network errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Network unreachable")]
    Offline,
    #[error("Request to {url} failed: {reason}")]
    Failed { url: String, reason: String },
}

/// Result type for network fetches.
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Performs live fetches.
///
/// An HTTP error status is still a successful fetch; only transport
/// failures are errors.
pub trait Network {
    fn fetch<'a>(&'a self, request: &'a Request<()>) -> BoxFuture<'a, NetworkResult<Response<Bytes>>>;
}

/// Cache key for a request: its path and query.
///
/// Scheme and host are dropped so precached relative URLs match the
/// absolute URLs the browser requests.
pub fn request_key(request: &Request<()>) -> String {
    let uri = request.uri();
    let path = match uri.path() {
        "" => "/",
        path => path,
    };
    match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

/// Build a body-less GET request for a URL.
pub fn get_request(url: &str) -> Result<Request<()>, http::Error> {
    Request::get(url).body(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_key_ignores_origin() {
        let absolute = get_request("https://board.example/static/pwa/manifest.json?v=2").unwrap();
        let relative = get_request("/static/pwa/manifest.json?v=2").unwrap();
        assert_eq!(request_key(&absolute), "/static/pwa/manifest.json?v=2");
        assert_eq!(request_key(&absolute), request_key(&relative));
    }

    #[test]
    fn test_request_key_of_bare_origin() {
        let request = get_request("https://board.example").unwrap();
        assert_eq!(request_key(&request), "/");
    }
}
