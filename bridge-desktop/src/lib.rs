//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge traits for desktop hosts
//! (macOS, Windows, Linux) and for running the core outside a browser.
//!
//! ## Overview
//!
//! - `ApiTransport` using `reqwest`, resolving paths against a base URL and
//!   attaching an optional bearer token
//! - `ProbeClient` using a bare `reqwest` HEAD request with no credentials
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestApiTransport, ReqwestProbeClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let transport = ReqwestApiTransport::new("https://plugin.example.com/api")?
//!         .with_bearer_token("token");
//!     let probe = ReqwestProbeClient::new()?;
//!
//!     // Hand both to core_runtime::config::CoreConfig::builder()
//!     Ok(())
//! }
//! ```

mod http;
mod probe;

pub use http::ReqwestApiTransport;
pub use probe::ReqwestProbeClient;
