use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Failure raised by a host transport.
///
/// This is the complete set of shapes a host can report. Anything that does
/// not fit the first four variants belongs in [`TransportError::Other`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}")]
    Http {
        status: u16,
        /// Decoded response body, if the server sent one
        body: Option<Value>,
    },

    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("Network failure: {0}")]
    Network(String),

    /// The transport gave up waiting for a response.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// The request was cancelled before it settled.
    #[error("Aborted: {0}")]
    Aborted(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Shorthand for an HTTP failure without a body.
    pub fn status(status: u16) -> Self {
        Self::Http { status, body: None }
    }

    /// Shorthand for an HTTP failure with a JSON body.
    pub fn status_with_body(status: u16, body: Value) -> Self {
        Self::Http {
            status,
            body: Some(body),
        }
    }

    /// HTTP status code, when the failure carries one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_status_accessor() {
        assert_eq!(TransportError::status(404).http_status(), Some(404));
        assert_eq!(
            TransportError::Network("connection refused".into()).http_status(),
            None
        );
    }

    #[test]
    fn test_error_display() {
        let error = TransportError::status_with_body(422, json!({"detail": "bad"}));
        assert_eq!(error.to_string(), "HTTP 422");

        let error = TransportError::Other("socket hang up".into());
        assert_eq!(error.to_string(), "socket hang up");
    }
}
