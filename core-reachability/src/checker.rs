//! # Reachability Checker
//!
//! Probes one external address with a credential-free HEAD-equivalent
//! request under a checker-owned deadline. Results are reported, never
//! raised: every probe outcome maps onto a [`ReachabilityResult`].

use crate::result::{CheckSummary, ReachabilityResult};
use bridge_traits::{Clock, ProbeClient, SystemClock, TransportError};
use core_runtime::config::{ReachabilityConfig, DEFAULT_PROBE_TIMEOUT, DEFAULT_REACHABILITY_TARGET};
use core_runtime::logging::redact_url_credentials;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

const NETWORK_ERROR_MESSAGE: &str = "Network error - site may be down or unreachable";
const ZERO_COUNT_MESSAGE: &str = "Check count must be greater than zero";

pub struct ReachabilityChecker {
    probe: Arc<dyn ProbeClient>,
    clock: Arc<dyn Clock>,
    target: String,
    timeout: Duration,
    checks: AtomicU64,
}

impl ReachabilityChecker {
    pub fn new(probe: Arc<dyn ProbeClient>) -> Self {
        Self {
            probe,
            clock: Arc::new(SystemClock),
            target: DEFAULT_REACHABILITY_TARGET.to_string(),
            timeout: DEFAULT_PROBE_TIMEOUT,
            checks: AtomicU64::new(0),
        }
    }

    pub fn from_config(
        probe: Arc<dyn ProbeClient>,
        clock: Arc<dyn Clock>,
        config: &ReachabilityConfig,
    ) -> Self {
        Self::new(probe)
            .with_clock(clock)
            .with_target(config.target_url.clone())
            .with_timeout(config.timeout)
    }

    pub fn with_target(mut self, url: impl Into<String>) -> Self {
        self.target = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probes issued since construction or the last reset
    pub fn check_count(&self) -> u64 {
        self.checks.load(Ordering::Relaxed)
    }

    pub fn reset_counter(&self) {
        self.checks.store(0, Ordering::Relaxed);
    }

    /// Probe the target once.
    ///
    /// Any settled response counts as online, whatever its status code. The
    /// in-flight probe is dropped when the deadline passes.
    #[instrument(skip(self), fields(target = %redact_url_credentials(&self.target)))]
    pub async fn check_once(&self) -> ReachabilityResult {
        self.checks.fetch_add(1, Ordering::Relaxed);

        let timestamp = self.clock.now();
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.probe.probe(&self.target)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(Ok(response)) => {
                ReachabilityResult::online(&self.target, elapsed_ms, response.status, timestamp)
            }
            Err(_) | Ok(Err(TransportError::Timeout(_))) | Ok(Err(TransportError::Aborted(_))) => {
                ReachabilityResult::error(&self.target, self.timeout_message(), elapsed_ms, timestamp)
            }
            Ok(Err(TransportError::Network(cause))) => {
                debug!(cause = %cause, "Probe could not reach the target");
                ReachabilityResult::offline(&self.target, NETWORK_ERROR_MESSAGE, elapsed_ms, timestamp)
            }
            Ok(Err(other)) => {
                ReachabilityResult::offline(&self.target, other.to_string(), elapsed_ms, timestamp)
            }
        };

        match &result.error {
            None => info!(
                response_time_ms = elapsed_ms,
                status_code = result.status_code,
                "Target is reachable"
            ),
            Some(error) => warn!(
                status = %result.status,
                response_time_ms = elapsed_ms,
                error = %error,
                "Target check failed"
            ),
        }

        result
    }

    /// Run `count` sequential checks with `interval` between them
    pub async fn check_many(&self, count: u32, interval: Duration) -> CheckSummary {
        self.check_many_until(count, interval, CancellationToken::new())
            .await
    }

    /// Like [`check_many`](Self::check_many) but stops between checks once
    /// `cancel` fires, keeping the results gathered so far.
    #[instrument(skip(self, cancel))]
    pub async fn check_many_until(
        &self,
        count: u32,
        interval: Duration,
        cancel: CancellationToken,
    ) -> CheckSummary {
        if count == 0 {
            return CheckSummary::default().with_error(ZERO_COUNT_MESSAGE);
        }

        let mut results = Vec::new();
        for index in 0..count {
            if index > 0 {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            if cancel.is_cancelled() {
                break;
            }

            results.push(self.check_once().await);
        }

        let completed = results.len() as u32;
        let summary = CheckSummary::from_results(results);
        info!(
            completed,
            requested = count,
            online = summary.online_count,
            "Check sequence finished"
        );

        if completed < count {
            summary.with_error(format!(
                "Check sequence cancelled after {} of {} checks",
                completed, count
            ))
        } else {
            summary
        }
    }

    fn timeout_message(&self) -> String {
        let timeout = self.timeout;
        if timeout.subsec_millis() == 0 {
            format!("Request timeout after {} seconds", timeout.as_secs())
        } else {
            format!("Request timeout after {:.1} seconds", timeout.as_secs_f64())
        }
    }
}
