//! Reachability probe using a bare Reqwest client

use crate::http::map_reqwest_error;
use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result, TransportResult},
    probe::{ProbeClient, ProbeResponse},
};
use reqwest::{redirect, Client};
use tracing::debug;

/// HEAD-request probe with no credentials, no cookies, and no cache.
///
/// The client carries no timeout of its own; the reachability checker wraps
/// each probe in its own deadline. Redirects are not followed, so a 3xx from
/// the target still counts as an answer.
pub struct ReqwestProbeClient {
    client: Client,
}

impl ReqwestProbeClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(concat!("api-bridge-demo-probe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BridgeError::OperationFailed(format!("Failed to build probe client: {}", e))
            })?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProbeClient for ReqwestProbeClient {
    async fn probe(&self, url: &str) -> TransportResult<ProbeResponse> {
        let response = self
            .client
            .head(url)
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        debug!(url, status, "Probe answered");
        Ok(ProbeResponse::with_status(status))
    }
}
