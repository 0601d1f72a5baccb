//! # Host Bridge Traits
//!
//! Capability contracts that the host platform must satisfy before the plugin
//! core can talk to anything outside the process.
//!
//! ## Overview
//!
//! The host owns authentication, base-URL resolution, and serialization of
//! outbound calls. The core never issues a request itself: it receives a
//! transport object from the host and forwards verb calls to it. Each trait in
//! this crate describes one such capability with precise input and output
//! types, so a mismatched host implementation fails at compile time instead of
//! at call time.
//!
//! ## Traits
//!
//! ### Networking
//! - [`ApiTransport`](http::ApiTransport) - Authenticated GET/POST/PUT/DELETE against the backend
//! - [`ProbeClient`](probe::ProbeClient) - Unauthenticated, minimal reachability probe
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Failure shapes
//!
//! Transports report failures through the closed [`TransportError`] set
//! (HTTP status, network failure, timeout, abort, anything else). The request
//! wrapper in `core-api` matches on it exhaustively to build user-facing
//! errors, so implementations should pick the most specific variant they can:
//!
//! - A response with a non-2xx status is [`TransportError::Http`], carrying
//!   the decoded body when there is one
//! - DNS, connect, TLS, and reset failures are [`TransportError::Network`]
//! - A transport-side timeout is [`TransportError::Timeout`]
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single transport instance can
//! be shared by every service through an `Arc`.
//!
//! ## Examples
//!
//! ### Implementing ApiTransport
//!
//! ```ignore
//! use bridge_traits::http::{ApiTransport, RequestOptions};
//! use bridge_traits::error::TransportResult;
//! use async_trait::async_trait;
//! use serde_json::Value;
//!
//! pub struct HostTransport {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl ApiTransport for HostTransport {
//!     async fn get(&self, path: &str, options: &RequestOptions) -> TransportResult<Value> {
//!         // Implementation
//!         todo!()
//!     }
//!     // post, put, delete ...
//! }
//! ```

pub mod error;
pub mod http;
pub mod probe;
pub mod time;

pub use error::{BridgeError, TransportError, TransportResult};

// Re-export commonly used types
pub use http::{ApiTransport, HttpMethod, RequestOptions};
pub use probe::{ProbeClient, ProbeResponse};
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
