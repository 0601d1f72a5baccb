//! # Core Configuration Module
//!
//! Provides configuration management for the plugin core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! holding every host capability and setting the core needs. `build()` fails
//! fast when a required capability is missing instead of letting the first
//! request discover it.
//!
//! ## Required Capabilities
//!
//! - `ApiTransport` - Authenticated backend calls
//! - `ProbeClient` - Unauthenticated reachability probes
//!
//! Both have desktop defaults when the `desktop-shims` feature is enabled: the
//! transport is built from `api_base_url` (plus an optional token) and the
//! probe client needs no settings at all.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("https://plugin.example.com/api")
//!     .api_token("secret")
//!     .reachability_target("https://www.example.org")
//!     .probe_timeout(Duration::from_secs(10))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! // Without desktop-shims and without an injected transport this fails with
//! // Error::CapabilityMissing naming "ApiTransport".
//! let result = CoreConfig::builder().build();
//! assert!(result.is_err());
//! ```

use crate::error::{Error, Result};
use bridge_traits::{ApiTransport, Clock, ProbeClient, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Address probed by the reachability checker unless configured otherwise
pub const DEFAULT_REACHABILITY_TARGET: &str = "https://www.google.com";

/// Hard deadline for a single reachability probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause between consecutive probes in a repeated check
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Number of probes in a repeated check when the caller does not say
pub const DEFAULT_CHECK_COUNT: u32 = 5;

const MAX_PROBE_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_CHECK_INTERVAL: Duration = Duration::from_secs(60);
const MAX_CHECK_COUNT: u32 = 100;

/// Core configuration for the plugin core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Host transport for authenticated backend calls
    pub api_transport: Arc<dyn ApiTransport>,

    /// Host capability for reachability probes
    pub probe_client: Arc<dyn ProbeClient>,

    /// Time source for envelope and result timestamps
    pub clock: Arc<dyn Clock>,

    /// Backend base URL, when the default transport was built from one
    pub api_base_url: Option<String>,

    /// Reachability checker settings
    pub reachability: ReachabilityConfig,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_transport", &"ApiTransport { ... }")
            .field("probe_client", &"ProbeClient { ... }")
            .field("clock", &"Clock { ... }")
            .field("api_base_url", &self.api_base_url)
            .field("reachability", &self.reachability)
            .finish()
    }
}

/// Settings for the external reachability checker.
///
/// # Example
///
/// ```
/// use core_runtime::config::ReachabilityConfig;
/// use std::time::Duration;
///
/// let config = ReachabilityConfig::default()
///     .with_target_url("https://status.example.com")
///     .with_interval(Duration::from_millis(500));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityConfig {
    /// The single external address being probed
    pub target_url: String,

    /// Deadline enforced by the checker around each probe
    pub timeout: Duration,

    /// Probes per repeated check when the caller does not choose
    pub default_check_count: u32,

    /// Pause between probes in a repeated check
    pub default_interval: Duration,
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_REACHABILITY_TARGET.to_string(),
            timeout: DEFAULT_PROBE_TIMEOUT,
            default_check_count: DEFAULT_CHECK_COUNT,
            default_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

impl ReachabilityConfig {
    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_check_count(mut self, count: u32) -> Self {
        self.default_check_count = count;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.default_interval = interval;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.target_url).map_err(|e| {
            Error::Config(format!(
                "Reachability target '{}' is not a valid URL: {}",
                self.target_url, e
            ))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(Error::Config(format!(
                "Reachability target '{}' must be an http(s) URL with a host",
                self.target_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(Error::Config(
                "Probe timeout must be greater than 0".to_string(),
            ));
        }

        if self.timeout > MAX_PROBE_TIMEOUT {
            return Err(Error::Config(
                "Probe timeout exceeds maximum of 60 seconds".to_string(),
            ));
        }

        if self.default_interval > MAX_CHECK_INTERVAL {
            return Err(Error::Config(
                "Check interval exceeds maximum of 60 seconds".to_string(),
            ));
        }

        if self.default_check_count == 0 || self.default_check_count > MAX_CHECK_COUNT {
            return Err(Error::Config(format!(
                "Default check count must be between 1 and {}",
                MAX_CHECK_COUNT
            )));
        }

        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(base) = &self.api_base_url {
            if base.trim().is_empty() {
                return Err(Error::Config("API base URL cannot be empty".to_string()));
            }
        }

        self.reachability.validate()
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_transport(
    base_url: Option<&str>,
    token: Option<&str>,
) -> Result<Arc<dyn ApiTransport>> {
    use bridge_desktop::ReqwestApiTransport;

    let base_url = base_url.ok_or_else(|| Error::CapabilityMissing {
        capability: "ApiTransport".to_string(),
        message: "No transport injected and no API base URL set. \
                  Use .api_base_url() for the desktop transport or .api_transport() to inject one."
            .to_string(),
    })?;

    let mut transport = ReqwestApiTransport::new(base_url)?;
    if let Some(token) = token {
        transport = transport.with_bearer_token(token);
    }

    let transport: Arc<dyn ApiTransport> = Arc::new(transport);
    Ok(transport)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_transport(
    _base_url: Option<&str>,
    _token: Option<&str>,
) -> Result<Arc<dyn ApiTransport>> {
    Err(Error::CapabilityMissing {
        capability: "ApiTransport".to_string(),
        message: "ApiTransport implementation is required for backend calls. \
                  Desktop: enable the 'desktop-shims' feature and set .api_base_url(). \
                  Web hosts: inject the platform's API service bridge with .api_transport()."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_probe_client() -> Result<Arc<dyn ProbeClient>> {
    use bridge_desktop::ReqwestProbeClient;

    let probe: Arc<dyn ProbeClient> = Arc::new(ReqwestProbeClient::new()?);
    Ok(probe)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_probe_client() -> Result<Arc<dyn ProbeClient>> {
    Err(Error::CapabilityMissing {
        capability: "ProbeClient".to_string(),
        message: "ProbeClient implementation is required for reachability checks. \
                  Desktop: enable the 'desktop-shims' feature. \
                  Web hosts: inject a fetch-based probe with .probe_client()."
            .to_string(),
    })
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_transport: Option<Arc<dyn ApiTransport>>,
    probe_client: Option<Arc<dyn ProbeClient>>,
    clock: Option<Arc<dyn Clock>>,
    api_base_url: Option<String>,
    api_token: Option<String>,
    reachability: Option<ReachabilityConfig>,
}

impl CoreConfigBuilder {
    /// Sets the backend base URL used by the default desktop transport.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the bearer token attached by the default desktop transport.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Injects a host transport, bypassing the desktop default.
    pub fn api_transport(mut self, transport: Arc<dyn ApiTransport>) -> Self {
        self.api_transport = Some(transport);
        self
    }

    /// Injects a host probe client, bypassing the desktop default.
    pub fn probe_client(mut self, probe: Arc<dyn ProbeClient>) -> Self {
        self.probe_client = Some(probe);
        self
    }

    /// Injects a time source (defaults to [`SystemClock`]).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replaces the whole reachability section.
    pub fn reachability(mut self, config: ReachabilityConfig) -> Self {
        self.reachability = Some(config);
        self
    }

    /// Sets the external address probed by the reachability checker.
    pub fn reachability_target(mut self, url: impl Into<String>) -> Self {
        let config = self.reachability.take().unwrap_or_default();
        self.reachability = Some(config.with_target_url(url));
        self
    }

    /// Sets the per-probe deadline.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        let config = self.reachability.take().unwrap_or_default();
        self.reachability = Some(config.with_timeout(timeout));
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - `Error::CapabilityMissing` when a transport or probe client can be
    ///   neither found nor defaulted
    /// - `Error::Config` when a value is out of range
    /// - `Error::Bridge` when the desktop default cannot be constructed
    pub fn build(self) -> Result<CoreConfig> {
        let api_transport = match self.api_transport {
            Some(transport) => transport,
            None => provide_default_transport(
                self.api_base_url.as_deref(),
                self.api_token.as_deref(),
            )?,
        };

        let probe_client = match self.probe_client {
            Some(probe) => probe,
            None => provide_default_probe_client()?,
        };

        let config = CoreConfig {
            api_transport,
            probe_client,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            api_base_url: self.api_base_url,
            reachability: self.reachability.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
