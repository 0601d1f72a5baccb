//! Error taxonomy and classification for backend calls
//!
//! Every failure that leaves the request wrapper is a [`ClassifiedError`]:
//! one human-readable message plus a short [`ErrorKind`] token. Raw transport
//! failures are mapped by [`classify`], which matches exhaustively over
//! [`TransportError`] so no host failure shape can slip through unclassified.

use bridge_traits::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

pub const NOT_CONNECTED_MESSAGE: &str =
    "API service is not connected - the host has not provided a transport";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - please check your connection";
pub const TIMEOUT_MESSAGE: &str = "Request timeout - please try again";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Short error code token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ServiceNotConnected,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ValidationError,
    InternalServerError,
    ServiceUnavailable,
    /// Any HTTP status without its own entry
    HttpError,
    NetworkError,
    Timeout,
    UnknownError,
    /// Raised locally before a request is attempted
    ValidationFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ServiceNotConnected => "SERVICE_NOT_CONNECTED",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorKind::HttpError => "HTTP_ERROR",
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing error produced by the request wrapper
///
/// The message is never empty; constructors fall back to a generic text.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ClassifiedError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(rename = "code", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            message,
            status: None,
            kind: Some(kind),
            details: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Raised when a request is attempted before a transport is installed
    pub fn not_connected() -> Self {
        Self::new(ErrorKind::ServiceNotConnected, NOT_CONNECTED_MESSAGE)
    }

    /// Local validation failure; never reaches the network
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == Some(kind)
    }

    /// Record how long the failed call took alongside any existing details
    pub(crate) fn attach_duration(mut self, duration_ms: u64) -> Self {
        self.details = Some(match self.details.take() {
            Some(Value::Object(mut map)) => {
                map.insert("duration_ms".to_string(), json!(duration_ms));
                Value::Object(map)
            }
            Some(other) => json!({ "duration_ms": duration_ms, "body": other }),
            None => json!({ "duration_ms": duration_ms }),
        });
        self
    }
}

/// Fixed code and message for an HTTP status
fn status_entry(status: u16) -> (ErrorKind, Cow<'static, str>) {
    match status {
        400 => (
            ErrorKind::BadRequest,
            Cow::Borrowed("Bad request - please check your input"),
        ),
        401 => (
            ErrorKind::Unauthorized,
            Cow::Borrowed("Authentication required - please log in"),
        ),
        403 => (
            ErrorKind::Forbidden,
            Cow::Borrowed("Access denied - insufficient permissions"),
        ),
        404 => (ErrorKind::NotFound, Cow::Borrowed("Resource not found")),
        422 => (
            ErrorKind::ValidationError,
            Cow::Borrowed("Validation failed - please check your input"),
        ),
        500 => (
            ErrorKind::InternalServerError,
            Cow::Borrowed("Internal server error - please try again later"),
        ),
        503 => (
            ErrorKind::ServiceUnavailable,
            Cow::Borrowed("Service temporarily unavailable - please try again later"),
        ),
        other => (ErrorKind::HttpError, Cow::Owned(format!("HTTP error {}", other))),
    }
}

/// Server-supplied text, `detail` first then `message`
fn server_message(body: &Value) -> Option<&str> {
    ["detail", "message"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
}

fn mentions_timeout(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("timeout") || lower.contains("timed out")
}

fn timeout_error(cause: &str) -> ClassifiedError {
    ClassifiedError::new(ErrorKind::Timeout, TIMEOUT_MESSAGE)
        .with_status(408)
        .with_details(json!({ "cause": cause }))
}

/// Map a transport failure onto the fixed taxonomy
///
/// HTTP-shaped failures are classified by status first, even when their body
/// mentions a timeout. For statuses other than 401 and 403 a server-supplied
/// `detail`/`message` replaces the fixed text.
pub fn classify(error: &TransportError) -> ClassifiedError {
    match error {
        TransportError::Http { status, body } => {
            let (kind, fixed) = status_entry(*status);
            let override_allowed = !matches!(*status, 401 | 403);

            let message = match body.as_ref().and_then(server_message) {
                Some(text) if override_allowed => text.to_string(),
                _ => fixed.into_owned(),
            };

            let mut classified = ClassifiedError::new(kind, message).with_status(*status);
            if let Some(body) = body {
                classified = classified.with_details(body.clone());
            }
            classified
        }
        TransportError::Network(cause) => {
            ClassifiedError::new(ErrorKind::NetworkError, NETWORK_ERROR_MESSAGE)
                .with_status(0)
                .with_details(json!({ "cause": cause }))
        }
        TransportError::Timeout(cause) | TransportError::Aborted(cause) => timeout_error(cause),
        TransportError::Other(message) if mentions_timeout(message) => timeout_error(message),
        TransportError::Other(message) => {
            ClassifiedError::new(ErrorKind::UnknownError, message.as_str()).with_status(500)
        }
    }
}

impl From<TransportError> for ClassifiedError {
    fn from(error: TransportError) -> Self {
        classify(&error)
    }
}

pub type Result<T> = std::result::Result<T, ClassifiedError>;
