//! Dashboard error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ticketdesk_common::TicketDeskError;
use ticketdesk_store::StoreError;
use tracing::error;

/// Errors raised by dashboard handlers and the admin database.
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    /// A guild, panel, admin or ban does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The request clashes with existing state.
    #[error("{0}")]
    Conflict(String),

    /// The signed-in admin may not do this.
    #[error("{0}")]
    PermissionDenied(String),

    /// SQLite failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON document store failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Password hashing failure.
    #[error("Password hashing failed: {0}")]
    Hash(String),

    /// Page rendering failure.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A blocking store task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}

/// Result type for dashboard handlers.
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Storage(_) | Self::Hash(_) | Self::Template(_) | Self::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
            return (status, "Internal server error").into_response();
        }
        (status, self.to_string()).into_response()
    }
}

impl From<WebError> for TicketDeskError {
    fn from(err: WebError) -> Self {
        match err {
            WebError::NotFound(what) => Self::NotFound(what),
            WebError::Conflict(msg) => Self::Validation(msg),
            WebError::PermissionDenied(msg) => Self::Permission(msg),
            WebError::Database(e) => Self::Database(e.to_string()),
            other => Self::Storage(other.to_string()),
        }
    }
}
