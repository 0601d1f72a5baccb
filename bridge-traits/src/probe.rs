//! Reachability Probe Abstraction
//!
//! A minimal, credential-free request used only to find out whether an
//! external address answers at all.

use async_trait::async_trait;

use crate::error::TransportResult;

/// Outcome of a probe that settled without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeResponse {
    /// Status code, when the host can see it
    pub status: Option<u16>,
    /// True when the response was opaque to the host (cross-origin, no-cors)
    pub opaque: bool,
}

impl ProbeResponse {
    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            opaque: false,
        }
    }

    pub fn opaque() -> Self {
        Self {
            status: None,
            opaque: true,
        }
    }
}

/// Probe client trait
///
/// Implementations must send a HEAD-equivalent request without credentials
/// and bypass any HTTP cache. They should not apply their own timeout: the
/// caller owns the deadline and cancels the returned future when it expires.
///
/// # Platform Support
///
/// - **Desktop**: `reqwest` HEAD request
/// - **Web**: `fetch` with `mode: "no-cors"`, which yields opaque responses
#[async_trait]
pub trait ProbeClient: Send + Sync {
    /// Probe `url` once
    async fn probe(&self, url: &str) -> TransportResult<ProbeResponse>;
}
