//! Error type for document and repository operations.

use thiserror::Error;
use ticketdesk_common::TicketDeskError;

/// Errors raised while persisting documents or applying updates.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document could not be written.
    #[error("Document I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be converted to or from JSON.
    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A partial update carried a value of the wrong shape.
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField {
        /// Offending key.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl StoreError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for TicketDeskError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidField { .. } => Self::Validation(err.to_string()),
            other => Self::Storage(other.to_string()),
        }
    }
}
