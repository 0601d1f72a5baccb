use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const FALLBACK_ERROR: &str = "An unexpected error occurred";

/// Start, end and length of one domain operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Uniform result of a domain operation
///
/// A successful envelope never carries an error string; a failed one always
/// carries a non-empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timing: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            FALLBACK_ERROR.to_string()
        } else {
            error
        };

        Self {
            success: false,
            data: None,
            error: Some(error),
            timing: None,
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Collapse into a `Result`, dropping timing
    pub fn into_result(self) -> Result<Option<T>, String> {
        match self.error {
            Some(error) if !self.success => Err(error),
            _ => Ok(self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_error() {
        let envelope = Envelope::ok(5);
        assert!(envelope.is_success());
        assert!(envelope.error.is_none());
        assert_eq!(envelope.into_result(), Ok(Some(5)));
    }

    #[test]
    fn test_failure_message_never_empty() {
        let envelope: Envelope<()> = Envelope::failure("  ");
        assert!(!envelope.is_success());
        assert_eq!(envelope.error_message(), Some(FALLBACK_ERROR));

        let envelope: Envelope<()> = Envelope::failure("Resource not found");
        assert_eq!(envelope.into_result(), Err("Resource not found".to_string()));
    }

    #[test]
    fn test_serialized_shape() {
        let envelope: Envelope<u8> = Envelope::failure("nope");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, serde_json::json!({"success": false, "error": "nope"}));
    }
}
