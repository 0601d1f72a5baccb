//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided capabilities (backend transport,
//! reachability probe, clock) into one request wrapper, one item service and
//! one reachability checker. Desktop hosts typically enable the
//! `desktop-shims` feature, which supplies `reqwest`-backed defaults from
//! `bridge-desktop`; other hosts inject their own implementations through
//! [`CoreConfig::builder`].

pub mod error;

pub use error::{CoreError, Result};

pub use core_api::{ApiServiceBridge, ClassifiedError, ErrorKind, RequestStats};
pub use core_items::{Envelope, Item, ItemInput, ItemList, ItemService, ItemUpdate, ValidationReport};
pub use core_reachability::{CheckSummary, ReachabilityChecker, ReachabilityResult, SiteStatus};
pub use core_runtime::config::{CoreConfig, CoreConfigBuilder, ReachabilityConfig};

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::{ReqwestApiTransport, ReqwestProbeClient};

use std::sync::Arc;
use tracing::info;

struct CoreComponents {
    config: CoreConfig,
    bridge: Arc<ApiServiceBridge>,
    items: ItemService,
    checker: ReachabilityChecker,
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    inner: Arc<CoreComponents>,
}

impl CoreService {
    /// Compose the core from a built configuration.
    ///
    /// The request wrapper starts out connected to the configured transport.
    pub fn new(config: CoreConfig) -> Self {
        let bridge = Arc::new(ApiServiceBridge::with_transport(Arc::clone(
            &config.api_transport,
        )));
        let items = ItemService::new(Arc::clone(&bridge)).with_clock(Arc::clone(&config.clock));
        let checker = ReachabilityChecker::from_config(
            Arc::clone(&config.probe_client),
            Arc::clone(&config.clock),
            &config.reachability,
        );

        info!(
            target_url = %core_runtime::logging::redact_url_credentials(checker.target()),
            "Core service ready"
        );

        Self {
            inner: Arc::new(CoreComponents {
                config,
                bridge,
                items,
                checker,
            }),
        }
    }

    /// Build the configuration and compose the core in one step.
    ///
    /// ```no_run
    /// # fn example() -> core_service::Result<()> {
    /// use core_service::{CoreConfig, CoreService};
    ///
    /// let core = CoreService::bootstrap(
    ///     CoreConfig::builder().api_base_url("https://api.example.com"),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn bootstrap(builder: CoreConfigBuilder) -> Result<Self> {
        let config = builder.build()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    /// The shared request wrapper
    pub fn bridge(&self) -> Arc<ApiServiceBridge> {
        Arc::clone(&self.inner.bridge)
    }

    pub fn items(&self) -> &ItemService {
        &self.inner.items
    }

    pub fn checker(&self) -> &ReachabilityChecker {
        &self.inner.checker
    }

    /// Run a check sequence with the configured count and interval
    pub async fn run_default_checks(&self) -> CheckSummary {
        let settings = &self.inner.config.reachability;
        self.inner
            .checker
            .check_many(settings.default_check_count, settings.default_interval)
            .await
    }
}
