//! Display helpers for reachability results

use crate::result::SiteStatus;
use url::Url;

/// True for absolute `http`/`https` URLs with a host
pub fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

pub fn status_description(status: SiteStatus) -> &'static str {
    match status {
        SiteStatus::Online => "Site is accessible and responding",
        SiteStatus::Offline => "Site is not accessible or not responding",
        SiteStatus::Error => "An error occurred while checking the site",
        SiteStatus::Checking => "Checking site status...",
    }
}

/// `"850ms"` below one second, `"1.5s"` from there on
pub fn format_response_time(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}
