//! Bot process error types.

use poise::serenity_prelude as serenity;
use ticketdesk_config::ConfigError;
use ticketdesk_store::StoreError;

/// Errors that stop the bot from starting or keep it from running.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The document store could not be opened.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
