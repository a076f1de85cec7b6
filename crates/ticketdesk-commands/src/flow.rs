//! Ticket lifecycle shared by slash commands and component interactions.

use crate::convert::{channel_key, guild_key, to_channel, to_role, to_user, user_key};
use crate::framework::{Data, Error};
use crate::render;
use poise::serenity_prelude as serenity;
use serenity::{
    ChannelType, CreateChannel, CreateMessage, EditChannel, PermissionOverwrite,
    PermissionOverwriteType, Permissions,
};
use serde_json::json;
use ticketdesk_common::{format_timestamp, TicketDeskError};
use ticketdesk_store::{GuildConfig, Ticket, TicketStatus};
use tracing::{info, warn};

/// Permissions given to members admitted to a ticket channel.
pub fn member_access() -> Permissions {
    Permissions::VIEW_CHANNEL
        | Permissions::SEND_MESSAGES
        | Permissions::READ_MESSAGE_HISTORY
        | Permissions::ATTACH_FILES
        | Permissions::EMBED_LINKS
}

/// Who is acting on a ticket.
#[derive(Debug, Clone)]
pub struct Actor {
    /// The acting user.
    pub user: serenity::UserId,
    /// Guild permissions resolved by Discord for the interaction.
    pub permissions: Option<Permissions>,
    /// Roles of the member.
    pub roles: Vec<serenity::RoleId>,
}

impl Actor {
    /// Builds an actor from an interaction's user and member.
    pub fn new(user: &serenity::User, member: Option<&serenity::Member>) -> Self {
        Self {
            user: user.id,
            permissions: member.and_then(|m| m.permissions),
            roles: member.map(|m| m.roles.clone()).unwrap_or_default(),
        }
    }

    /// Staff are members with Manage Channels or the panel's support role.
    pub fn is_staff(&self, support_role: Option<serenity::RoleId>) -> bool {
        self.permissions
            .is_some_and(|p| p.manage_channels() || p.administrator())
            || support_role.is_some_and(|role| self.roles.contains(&role))
    }
}

/// Whether a ticket may be closed by someone. Staff always may; the creator
/// only when the guild lets members close their own tickets.
pub const fn can_close(config: &GuildConfig, is_creator: bool, is_staff: bool) -> bool {
    is_staff || (is_creator && config.can_members_close)
}

/// A ticket channel together with its record.
pub struct TicketChannel {
    /// Guild of the channel.
    pub guild: serenity::GuildId,
    /// The channel.
    pub channel: serenity::ChannelId,
    /// Stored record.
    pub ticket: Ticket,
    /// Guild settings.
    pub config: GuildConfig,
}

impl TicketChannel {
    /// Loads the ticket hosted in `channel`.
    pub fn load(data: &Data, guild: serenity::GuildId, channel: serenity::ChannelId) -> Result<Self, Error> {
        let config = data.store.guilds.get_config(guild_key(guild));
        let ticket = config
            .ticket(channel_key(channel))
            .cloned()
            .ok_or_else(|| TicketDeskError::validation("This channel is not a ticket."))?;
        Ok(Self {
            guild,
            channel,
            ticket,
            config,
        })
    }

    /// Support role of the panel the ticket was opened from.
    pub fn support_role(&self) -> Option<serenity::RoleId> {
        self.ticket
            .panel_id
            .as_ref()
            .and_then(|id| self.config.panels.get(id))
            .and_then(|panel| panel.support_role_id)
            .and_then(to_role)
    }

    /// Whether `actor` opened this ticket.
    pub fn is_creator(&self, actor: &Actor) -> bool {
        self.ticket.creator_id == Some(user_key(actor.user))
    }

    /// Fails unless the actor is staff or the ticket's creator.
    pub fn require_participant(&self, actor: &Actor) -> Result<(), Error> {
        if self.is_creator(actor) || actor.is_staff(self.support_role()) {
            Ok(())
        } else {
            Err(TicketDeskError::permission("Only the ticket creator or staff can do that.").into())
        }
    }

    /// Fails unless the actor is staff.
    pub fn require_staff(&self, actor: &Actor) -> Result<(), Error> {
        if actor.is_staff(self.support_role()) {
            Ok(())
        } else {
            Err(TicketDeskError::permission("Only staff can do that.").into())
        }
    }
}

/// Opens a ticket from a panel and returns the new channel.
pub async fn open_ticket(
    ctx: &serenity::Context,
    data: &Data,
    guild: serenity::GuildId,
    user: &serenity::User,
    panel_id: &str,
    ticket_type: Option<String>,
) -> Result<serenity::ChannelId, Error> {
    let guild_id = guild_key(guild);
    let user_id = user_key(user.id);

    match data.bans.check(guild_id, user_id).await {
        Ok(status) if status.banned => {
            let reason = status.reason.unwrap_or_else(|| "no reason given".to_string());
            return Err(TicketDeskError::permission(format!(
                "You are banned from opening tickets in this server ({reason})."
            ))
            .into());
        }
        Ok(_) => {}
        Err(e) => warn!(guild = %guild_id, user = %user_id, error = %e, "Ban lookup failed, allowing ticket"),
    }

    let config = data.store.guilds.get_config(guild_id);
    let panel = config
        .panels
        .get(panel_id)
        .cloned()
        .ok_or_else(|| TicketDeskError::validation("This panel no longer exists."))?;

    let open = data.store.tickets.count_open_tickets_for_user(guild_id, user_id);
    if open >= config.max_tickets_per_user as usize {
        return Err(TicketDeskError::validation(format!(
            "You already have {open} open ticket(s). Close one before opening another."
        ))
        .into());
    }

    let bot_id = ctx.cache.current_user().id;
    let mut overwrites = vec![
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(serenity::RoleId::new(guild.get())),
        },
        PermissionOverwrite {
            allow: member_access(),
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(user.id),
        },
        PermissionOverwrite {
            allow: member_access() | Permissions::MANAGE_CHANNELS,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(bot_id),
        },
    ];
    if let Some(role) = panel.support_role_id.and_then(to_role) {
        overwrites.push(PermissionOverwrite {
            allow: member_access(),
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(role),
        });
    }

    let preview = config.next_ticket_number;
    let mut builder = CreateChannel::new(config.channel_name(preview))
        .kind(ChannelType::Text)
        .permissions(overwrites);
    if let Some(category) = panel.category_id.and_then(to_channel) {
        builder = builder.category(category);
    }
    let channel = guild.create_channel(ctx, builder).await?;

    let mut ticket = Ticket::opened_by(user_id, panel_id);
    ticket.ticket_type = ticket_type;
    let number = match data
        .store
        .tickets
        .create_ticket(guild_id, channel_key(channel.id), ticket.clone())
    {
        Ok(number) => number,
        Err(e) => {
            if let Err(cleanup) = channel.id.delete(ctx).await {
                warn!(channel = %channel.id, error = %cleanup, "Failed to remove channel of unsaved ticket");
            }
            return Err(e.into());
        }
    };
    ticket.ticket_number = number;

    if number != preview {
        channel
            .id
            .edit(ctx, EditChannel::new().name(config.channel_name(number)))
            .await?;
    }

    channel
        .id
        .send_message(ctx, render::welcome_message(&config, &panel, &ticket, user_id))
        .await?;

    info!(guild = %guild_id, user = %user_id, channel = %channel.id, number, panel_id, "Ticket opened");
    Ok(channel.id)
}

/// Closes a ticket: archives it when the guild archives tickets, otherwise
/// deletes both the record and the channel. Returns a summary for the actor.
pub async fn close_ticket(
    ctx: &serenity::Context,
    data: &Data,
    target: &TicketChannel,
    actor: &Actor,
    reason: Option<String>,
) -> Result<String, Error> {
    if !can_close(&target.config, target.is_creator(actor), actor.is_staff(target.support_role())) {
        return Err(TicketDeskError::permission("You are not allowed to close this ticket.").into());
    }
    let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    if target.config.require_close_reason && reason.is_none() {
        return Err(TicketDeskError::validation("A reason is required to close this ticket.").into());
    }

    let guild_id = guild_key(target.guild);
    let channel_id = channel_key(target.channel);
    let number = target.ticket.ticket_number;

    if target.config.auto_archive_tickets {
        let mut fields = json!({ "status": TicketStatus::Archived });
        if let Some(reason) = &reason {
            fields["close_reason"] = json!(reason);
        }
        if let serde_json::Value::Object(fields) = fields {
            data.store.tickets.update_ticket(guild_id, channel_id, &fields)?;
        }

        if let Some(creator) = target.ticket.creator_id.and_then(to_user) {
            if let Err(e) = target
                .channel
                .delete_permission(ctx, PermissionOverwriteType::Member(creator))
                .await
            {
                warn!(channel = %target.channel, error = %e, "Failed to revoke creator access");
            }
        }
        target
            .channel
            .edit(ctx, EditChannel::new().name(format!("archived-{number}")))
            .await?;

        let summary = format!(
            "Ticket #{number} archived by <@{}> at {}.{}",
            actor.user,
            format_timestamp(chrono::Utc::now()),
            reason.as_deref().map(|r| format!("\nReason: {r}")).unwrap_or_default()
        );
        target
            .channel
            .send_message(ctx, CreateMessage::new().content(&summary))
            .await?;
        info!(guild = %guild_id, channel = %channel_id, number, "Ticket archived");
        return Ok(summary);
    }

    data.store.tickets.delete_ticket(guild_id, channel_id)?;
    target.channel.delete(ctx).await?;
    info!(guild = %guild_id, channel = %channel_id, number, reason = ?reason, "Ticket closed");
    Ok(format!("Ticket #{number} closed."))
}

/// Lets a member see and write in a ticket.
pub async fn add_member(
    ctx: &serenity::Context,
    target: &TicketChannel,
    actor: &Actor,
    member: serenity::UserId,
) -> Result<String, Error> {
    target.require_participant(actor)?;
    target
        .channel
        .create_permission(
            ctx,
            PermissionOverwrite {
                allow: member_access(),
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(member),
            },
        )
        .await?;
    info!(channel = %target.channel, member = %member, "Member added to ticket");
    Ok(format!("<@{member}> was added to the ticket."))
}

/// Removes a member's access to a ticket. The creator cannot be removed.
pub async fn remove_member(
    ctx: &serenity::Context,
    target: &TicketChannel,
    actor: &Actor,
    member: serenity::UserId,
) -> Result<String, Error> {
    target.require_participant(actor)?;
    if target.ticket.creator_id == Some(user_key(member)) {
        return Err(TicketDeskError::validation("The ticket creator cannot be removed.").into());
    }
    target
        .channel
        .delete_permission(ctx, PermissionOverwriteType::Member(member))
        .await?;
    info!(channel = %target.channel, member = %member, "Member removed from ticket");
    Ok(format!("<@{member}> was removed from the ticket."))
}
