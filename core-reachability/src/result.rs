use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const FALLBACK_ERROR: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Online,
    Offline,
    Error,
    Checking,
}

impl SiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Online => "online",
            SiteStatus::Offline => "offline",
            SiteStatus::Error => "error",
            SiteStatus::Checking => "checking",
        }
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single probe
///
/// Build through the constructors: an `Online` result never carries error
/// text, while `Offline` and `Error` results always do. Every settled probe
/// records how long it took, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachabilityResult {
    pub url: String,
    pub status: SiteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    pub timestamp: DateTime<Utc>,
    /// Absent when the host only saw an opaque response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReachabilityResult {
    pub fn online(
        url: impl Into<String>,
        response_time_ms: u64,
        status_code: Option<u16>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            url: url.into(),
            status: SiteStatus::Online,
            response_time_ms: Some(response_time_ms),
            timestamp,
            status_code,
            error: None,
        }
    }

    pub fn offline(
        url: impl Into<String>,
        error: impl Into<String>,
        response_time_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::failed(SiteStatus::Offline, url.into(), error.into(), response_time_ms, timestamp)
    }

    pub fn error(
        url: impl Into<String>,
        error: impl Into<String>,
        response_time_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::failed(SiteStatus::Error, url.into(), error.into(), response_time_ms, timestamp)
    }

    /// Placeholder shown while a probe is in flight
    pub fn checking(url: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            status: SiteStatus::Checking,
            response_time_ms: None,
            timestamp,
            status_code: None,
            error: None,
        }
    }

    fn failed(
        status: SiteStatus,
        url: String,
        error: String,
        response_time_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let error = if error.trim().is_empty() {
            FALLBACK_ERROR.to_string()
        } else {
            error
        };

        Self {
            url,
            status,
            response_time_ms: Some(response_time_ms),
            timestamp,
            status_code: None,
            error: Some(error),
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == SiteStatus::Online
    }
}

/// Aggregate of a repeated check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub results: Vec<ReachabilityResult>,
    pub online_count: u32,
    pub total_checks: u32,
    /// Mean over every completed check, failed ones included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckSummary {
    pub fn from_results(results: Vec<ReachabilityResult>) -> Self {
        let online_count = results.iter().filter(|r| r.is_online()).count() as u32;
        let times: Vec<u64> = results.iter().filter_map(|r| r.response_time_ms).collect();
        let average_response_time_ms = if times.is_empty() {
            None
        } else {
            let total: u64 = times.iter().sum();
            Some((total as f64 / times.len() as f64).round() as u64)
        };

        Self {
            total_checks: results.len() as u32,
            online_count,
            average_response_time_ms,
            results,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
