//! Error types shared by the bot and the dashboard.

use thiserror::Error;

/// Application-wide error type.
///
/// The `Display` output of the user-facing variants is shown verbatim to
/// whoever triggered the failing action, so keep messages short.
#[derive(Error, Debug)]
pub enum TicketDeskError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discord API error.
    #[error("Discord API error: {message}")]
    Discord {
        /// What was being attempted.
        message: String,
        /// Underlying error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Document store error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Relational database error.
    #[error("Database error: {0}")]
    Database(String),

    /// The request conflicts with existing state (duplicates, self-deletion, limits).
    #[error("{0}")]
    Validation(String),

    /// The caller lacks the rights for this action.
    #[error("{0}")]
    Permission(String),

    /// A referenced guild, panel, ticket, admin or ban does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TicketDeskError {
    /// Create a new Discord error without a source.
    pub fn discord(msg: impl Into<String>) -> Self {
        Self::Discord {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new Discord error wrapping the failing call.
    pub fn discord_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Discord {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a permission error.
    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    /// Create a not-found error for the named thing.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Whether this error should be shown to the user as-is rather than as
    /// a generic failure.
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Permission(_) | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_variants() {
        assert!(TicketDeskError::validation("limit reached").is_user_facing());
        assert!(TicketDeskError::permission("denied").is_user_facing());
        assert!(TicketDeskError::not_found("Panel").is_user_facing());
        assert!(!TicketDeskError::discord("boom").is_user_facing());
        assert!(!TicketDeskError::Storage("disk".into()).is_user_facing());
    }

    #[test]
    fn test_display() {
        assert_eq!(TicketDeskError::not_found("Panel").to_string(), "Panel not found");
        assert_eq!(
            TicketDeskError::Config("missing token".into()).to_string(),
            "Configuration error: missing token"
        );
    }
}
