//! API Transport Abstraction
//!
//! The host-supplied capability that actually performs authenticated calls
//! against the plugin backend.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::error::TransportResult;

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call options forwarded untouched to the transport.
///
/// The transport decides what to do with them; the core only fills in a
/// request id header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Case-insensitive header lookup
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Async backend transport trait
///
/// The host installs one implementation of this trait into the request
/// wrapper. Implementations are responsible for:
/// - Resolving `path` against the backend base URL
/// - Injecting credentials
/// - Serializing payloads and decoding JSON responses
/// - Reporting non-2xx responses as [`TransportError::Http`](crate::TransportError::Http)
///
/// A successful call returns the decoded body. Empty bodies decode to
/// [`Value::Null`].
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{ApiTransport, RequestOptions};
///
/// async fn fetch_status(transport: &dyn ApiTransport) -> TransportResult<Value> {
///     transport.get("/status", &RequestOptions::default()).await
/// }
/// ```
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Issue a GET request
    async fn get(&self, path: &str, options: &RequestOptions) -> TransportResult<Value>;

    /// Issue a POST request with an optional JSON payload
    async fn post(
        &self,
        path: &str,
        payload: Option<Value>,
        options: &RequestOptions,
    ) -> TransportResult<Value>;

    /// Issue a PUT request with an optional JSON payload
    async fn put(
        &self,
        path: &str,
        payload: Option<Value>,
        options: &RequestOptions,
    ) -> TransportResult<Value>;

    /// Issue a DELETE request
    async fn delete(&self, path: &str, options: &RequestOptions) -> TransportResult<Value>;
}
