//! # Core API
//!
//! Request wrapper between the plugin core and the host's authenticated
//! backend transport.
//!
//! - [`ApiServiceBridge`] owns the installed [`bridge_traits::ApiTransport`],
//!   times every call and keeps request counters.
//! - [`classify`] turns raw [`bridge_traits::TransportError`] values into
//!   user-facing [`ClassifiedError`]s with a stable [`ErrorKind`] token.

pub mod bridge;
pub mod error;

pub use bridge::{ApiMethod, ApiResponse, ApiServiceBridge, RequestStats, REQUEST_ID_HEADER};
pub use error::{classify, ClassifiedError, ErrorKind, Result};
