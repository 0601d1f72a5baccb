//! # Core Reachability
//!
//! Checks whether a single external address answers at all, independently
//! of the authenticated backend.

pub mod checker;
pub mod helpers;
pub mod result;

pub use checker::ReachabilityChecker;
pub use helpers::{format_response_time, is_valid_url, status_description};
pub use result::{CheckSummary, ReachabilityResult, SiteStatus};
