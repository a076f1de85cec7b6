//! Startup sweep that drops tickets whose channel no longer exists.
//!
//! A ticket channel deleted straight from the Discord client never goes
//! through the close flow, so its record would otherwise linger and keep
//! counting against the creator's open-ticket limit.

use crate::ticket::TicketRepository;
use async_trait::async_trait;
use std::collections::HashSet;
use ticketdesk_common::{ChannelId, GuildId, Result};
use tracing::{error, info, warn};

#[cfg(test)]
use mockall::automock;

/// Source of the channels that currently exist in a guild.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Ids of every channel the guild has right now.
    async fn channel_ids(&self, guild: GuildId) -> Result<HashSet<ChannelId>>;
}

/// Deletes the ticket records of every guild in `guilds` whose channel is
/// gone. Returns how many records were removed.
///
/// A guild whose channel list cannot be fetched, or whose record cannot be
/// saved, is logged and skipped.
pub async fn reconcile_tickets(
    tickets: &TicketRepository,
    directory: &dyn ChannelDirectory,
    guilds: &[GuildId],
) -> usize {
    let mut removed = 0;

    for &guild in guilds {
        let live = match directory.channel_ids(guild).await {
            Ok(live) => live,
            Err(e) => {
                error!(guild = %guild, error = %e, "Failed to list channels, skipping guild");
                continue;
            }
        };

        match tickets.retain_live(guild, &live) {
            Ok(orphaned) => {
                for channel in &orphaned {
                    info!(guild = %guild, channel = %channel, "Removed ticket for deleted channel");
                }
                removed += orphaned.len();
            }
            Err(e) => warn!(guild = %guild, error = %e, "Failed to prune tickets"),
        }
    }

    if removed > 0 {
        info!(removed, "Ticket reconciliation finished");
    }
    removed
}
