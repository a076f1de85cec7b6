//! Ticket repository. Tickets live inside their guild's config record, keyed
//! by the channel hosting them.

use crate::guild::GuildConfigRepository;
use crate::model::{Fields, Ticket};
use crate::StoreError;
use std::collections::{BTreeMap, HashSet};
use ticketdesk_common::{ChannelId, GuildId, UserId};
use tracing::{debug, info};

/// CRUD over the tickets of a guild.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    guilds: GuildConfigRepository,
}

impl TicketRepository {
    /// Creates a repository on top of the guild config repository.
    pub const fn new(guilds: GuildConfigRepository) -> Self {
        Self { guilds }
    }

    /// Returns the ticket hosted in a channel.
    pub fn get_ticket(&self, guild: GuildId, channel: ChannelId) -> Option<Ticket> {
        self.guilds
            .get_config(guild)
            .tickets
            .remove(&channel.to_string())
    }

    /// Returns every ticket of a guild keyed by channel id.
    pub fn list_tickets(&self, guild: GuildId) -> BTreeMap<String, Ticket> {
        self.guilds.get_config(guild).tickets
    }

    /// Stores a ticket and returns its number.
    ///
    /// A ticket numbered 0 takes the guild's next number and the counter is
    /// advanced in the same save. Any other number is kept as given.
    pub fn create_ticket(&self, guild: GuildId, channel: ChannelId, mut ticket: Ticket) -> Result<u64, StoreError> {
        let number = self.guilds.modify(guild, |config| {
            if ticket.ticket_number == 0 {
                ticket.ticket_number = config.next_ticket_number;
                config.next_ticket_number += 1;
            }
            let number = ticket.ticket_number;
            config.tickets.insert(channel.to_string(), ticket);
            Ok((number, true))
        })?;
        info!(guild = %guild, channel = %channel, number, "Created ticket");
        Ok(number)
    }

    /// Merges fields into an existing ticket. Returns false when there is no
    /// ticket for the channel.
    pub fn update_ticket(&self, guild: GuildId, channel: ChannelId, fields: &Fields) -> Result<bool, StoreError> {
        self.guilds.modify(guild, |config| {
            match config.tickets.get_mut(&channel.to_string()) {
                Some(ticket) => {
                    let ignored = ticket.apply_update(fields)?;
                    if !ignored.is_empty() {
                        debug!(guild = %guild, channel = %channel, ?ignored, "Ignored protected ticket keys");
                    }
                    Ok((true, true))
                }
                None => Ok((false, false)),
            }
        })
    }

    /// Removes a ticket. Returns whether it existed.
    pub fn delete_ticket(&self, guild: GuildId, channel: ChannelId) -> Result<bool, StoreError> {
        self.guilds.modify(guild, |config| {
            let removed = config.tickets.remove(&channel.to_string()).is_some();
            Ok((removed, removed))
        })
    }

    /// Number of open tickets created by a member.
    pub fn count_open_tickets_for_user(&self, guild: GuildId, user: UserId) -> usize {
        self.guilds
            .get_config(guild)
            .tickets
            .values()
            .filter(|ticket| ticket.is_open_for(user))
            .count()
    }

    /// Removes every ticket whose channel is not in `live`, in one save.
    /// Returns the channels that were dropped.
    pub fn retain_live(&self, guild: GuildId, live: &HashSet<ChannelId>) -> Result<Vec<String>, StoreError> {
        self.guilds.modify(guild, |config| {
            let orphaned: Vec<String> = config
                .tickets
                .keys()
                .filter(|key| {
                    key.parse::<ChannelId>()
                        .map_or(true, |channel| !live.contains(&channel))
                })
                .cloned()
                .collect();
            for key in &orphaned {
                config.tickets.remove(key);
            }
            let changed = !orphaned.is_empty();
            Ok((orphaned, changed))
        })
    }
}
