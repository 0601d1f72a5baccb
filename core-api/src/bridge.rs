//! # API Service Bridge
//!
//! Single choke point for authenticated backend calls. The host installs an
//! [`ApiTransport`] once through [`ApiServiceBridge::connect`]; every request
//! afterwards is timed, stamped with a request id, logged and, on failure,
//! classified into a [`ClassifiedError`].
//!
//! ## Usage
//!
//! ```ignore
//! let bridge = Arc::new(ApiServiceBridge::new());
//! bridge.connect(transport).await;
//!
//! let response = bridge.get("/items").await?;
//! println!("{} ms", response.duration_ms);
//! ```

use crate::error::{classify, ClassifiedError, Result};
use bridge_traits::{ApiTransport, HttpMethod, RequestOptions};
use core_runtime::logging::redact_if_sensitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn, Span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Verbs accepted by the wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ApiMethod {
    pub fn as_str(&self) -> &'static str {
        HttpMethod::from(*self).as_str()
    }
}

impl From<ApiMethod> for HttpMethod {
    fn from(method: ApiMethod) -> Self {
        match method {
            ApiMethod::Get => HttpMethod::Get,
            ApiMethod::Post => HttpMethod::Post,
            ApiMethod::Put => HttpMethod::Put,
            ApiMethod::Delete => HttpMethod::Delete,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful call result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub data: Value,
    pub duration_ms: u64,
}

/// Snapshot of the wrapper's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStats {
    /// Calls dispatched to a transport
    pub total_requests: u64,
    pub failed_requests: u64,
    pub last_duration_ms: u64,
}

#[derive(Default)]
pub struct ApiServiceBridge {
    transport: RwLock<Option<Arc<dyn ApiTransport>>>,
    total_requests: AtomicU64,
    failed_requests: AtomicU64,
    last_duration_ms: AtomicU64,
}

impl fmt::Debug for ApiServiceBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiServiceBridge")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl ApiServiceBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bridge that is connected from the start
    pub fn with_transport(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            transport: RwLock::new(Some(transport)),
            ..Self::default()
        }
    }

    /// Install (or replace) the host transport. Counters are kept.
    pub async fn connect(&self, transport: Arc<dyn ApiTransport>) {
        let mut slot = self.transport.write().await;
        let replaced = slot.replace(transport).is_some();
        info!(replaced, "API service bridge connected");
    }

    pub async fn disconnect(&self) {
        if self.transport.write().await.take().is_some() {
            info!("API service bridge disconnected");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.transport.read().await.is_some()
    }

    /// Perform one backend call through the installed transport.
    ///
    /// # Errors
    ///
    /// `SERVICE_NOT_CONNECTED` when no transport is installed; no call is
    /// attempted and the counters are left alone. Every transport failure is
    /// mapped through [`classify`] and carries `duration_ms` in its details.
    #[instrument(
        skip(self, payload, options),
        fields(method = %method, path = %path, request_id = tracing::field::Empty)
    )]
    pub async fn request(
        &self,
        method: ApiMethod,
        path: &str,
        payload: Option<Value>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse> {
        // Clone the handle out so the lock is not held across the network wait.
        let transport = match self.transport.read().await.as_ref() {
            Some(transport) => Arc::clone(transport),
            None => {
                warn!("Request attempted before a transport was connected");
                return Err(ClassifiedError::not_connected());
            }
        };

        let mut options = options.unwrap_or_default();
        let request_id = match options.get_header(REQUEST_ID_HEADER) {
            Some(existing) => existing.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                options.headers.insert(REQUEST_ID_HEADER.to_string(), id.clone());
                id
            }
        };
        Span::current().record("request_id", request_id.as_str());

        self.total_requests.fetch_add(1, Ordering::Relaxed);
        debug!(
            has_payload = payload.is_some(),
            headers = ?redacted_headers(&options),
            "Dispatching API request"
        );

        let started = Instant::now();
        let outcome = match method {
            ApiMethod::Get => transport.get(path, &options).await,
            ApiMethod::Post => transport.post(path, payload, &options).await,
            ApiMethod::Put => transport.put(path, payload, &options).await,
            ApiMethod::Delete => transport.delete(path, &options).await,
        };
        let duration_ms = started.elapsed().as_millis() as u64;
        self.last_duration_ms.store(duration_ms, Ordering::Relaxed);

        match outcome {
            Ok(data) => {
                info!(duration_ms, "API request completed");
                Ok(ApiResponse { data, duration_ms })
            }
            Err(error) => {
                self.failed_requests.fetch_add(1, Ordering::Relaxed);
                let classified = classify(&error).attach_duration(duration_ms);
                warn!(
                    duration_ms,
                    status = classified.status,
                    code = classified.kind.map(|kind| kind.as_str()),
                    error = %classified.message,
                    "API request failed"
                );
                Err(classified)
            }
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(ApiMethod::Get, path, None, None).await
    }

    pub async fn post(&self, path: &str, payload: Value) -> Result<ApiResponse> {
        self.request(ApiMethod::Post, path, Some(payload), None).await
    }

    pub async fn put(&self, path: &str, payload: Value) -> Result<ApiResponse> {
        self.request(ApiMethod::Put, path, Some(payload), None).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(ApiMethod::Delete, path, None, None).await
    }

    pub fn stats(&self) -> RequestStats {
        RequestStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            last_duration_ms: self.last_duration_ms.load(Ordering::Relaxed),
        }
    }

    pub fn reset_stats(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.failed_requests.store(0, Ordering::Relaxed);
        self.last_duration_ms.store(0, Ordering::Relaxed);
        debug!("API request counters reset");
    }
}

fn redacted_headers(options: &RequestOptions) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = options
        .headers
        .iter()
        .map(|(name, value)| (name.clone(), redact_if_sensitive(name, value)))
        .collect();
    headers.sort();
    headers
}
