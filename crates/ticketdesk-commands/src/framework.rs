//! Poise framework setup and shared command state.

use crate::ban_check::BanChecker;
use std::sync::Arc;
use std::time::Duration;
use ticketdesk_common::TicketDeskError;
use ticketdesk_config::Config;
use ticketdesk_store::{Store, StoreError};

/// Application data accessible in all commands and event handlers.
pub struct Data {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Guild, panel, ticket and edit session repositories.
    pub store: Store,
    /// Dashboard ban lookups.
    pub bans: BanChecker,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("config", &"<Config>")
            .field("store", &self.store)
            .field("bans", &self.bans)
            .finish()
    }
}

impl Data {
    /// Builds the shared state, including the HTTP client used for ban lookups.
    pub fn new(config: Arc<Config>, store: Store) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.discord.request_timeout_seconds))
            .build()?;
        let bans = BanChecker::new(http_client, config.web.ban_check_url.clone());
        Ok(Self {
            config,
            store,
            bans,
        })
    }
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Every slash command the bot registers.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        crate::settings::settings(),
        crate::panel::panel(),
        crate::ticket::ticket(),
    ]
}

/// Framework options with commands, error handler and event handler wired in.
pub fn framework_options() -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands: commands(),
        on_error: |error| Box::pin(crate::events::on_error(error)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(crate::events::event_handler(ctx, event, framework, data))
        },
        ..Default::default()
    }
}

/// Text shown to a member when a handler fails.
///
/// Validation, permission and not-found errors are shown as they are; anything
/// else is replaced by a generic message and only logged.
pub fn user_message(error: &Error) -> String {
    if let Some(err) = error.downcast_ref::<TicketDeskError>() {
        if err.is_user_facing() {
            return err.to_string();
        }
    }
    if let Some(err) = error.downcast_ref::<StoreError>() {
        if matches!(err, StoreError::InvalidField { .. }) {
            return err.to_string();
        }
    }
    "Something went wrong while handling that. The error has been logged.".to_string()
}
