use core_api::ClassifiedError;
use thiserror::Error;

/// Failure of a single item operation before it is folded into an envelope
#[derive(Error, Debug)]
pub enum ItemsError {
    /// Only the classified message survives at this layer
    #[error("{}", .0.message)]
    Api(#[from] ClassifiedError),

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ItemsError {
    /// Local validation failure; no request is made
    pub fn invalid(message: &str) -> Self {
        ItemsError::Api(ClassifiedError::validation_failed(message))
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            ItemsError::Api(error) => error.kind.map(|kind| kind.as_str()),
            ItemsError::Parse(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ItemsError>;
