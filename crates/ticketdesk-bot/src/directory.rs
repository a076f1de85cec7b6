//! Channel listing backed by the Discord HTTP API.

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::collections::HashSet;
use std::sync::Arc;
use ticketdesk_common::{ChannelId, GuildId, Result, TicketDeskError};
use ticketdesk_store::ChannelDirectory;

/// Answers channel lookups for the reconciler using the bot's HTTP client.
#[derive(Clone)]
pub struct SerenityChannelDirectory {
    http: Arc<serenity::Http>,
}

impl SerenityChannelDirectory {
    /// Creates a directory that queries Discord through `http`.
    pub const fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChannelDirectory for SerenityChannelDirectory {
    async fn channel_ids(&self, guild: GuildId) -> Result<HashSet<ChannelId>> {
        let Some(id) = ticketdesk_commands::convert::to_guild(guild) else {
            return Ok(HashSet::new());
        };
        let channels = id
            .channels(self.http.as_ref())
            .await
            .map_err(|e| TicketDeskError::discord_with_source(format!("list channels of guild {guild}"), e))?;
        Ok(channels
            .into_keys()
            .map(ticketdesk_commands::convert::channel_key)
            .collect())
    }
}
