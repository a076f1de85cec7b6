//! `/ticket`: actions inside a ticket channel.

use crate::convert::{channel_key, guild_key, user_key};
use crate::flow::{self, Actor, TicketChannel};
use crate::framework::{Context, Error};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use serde_json::{json, Map, Value};
use ticketdesk_store::TicketPriority;
use tracing::info;

/// Priority levels offered by `/ticket priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum PriorityChoice {
    /// Not triaged.
    #[name = "None"]
    Untriaged,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

impl From<PriorityChoice> for TicketPriority {
    fn from(choice: PriorityChoice) -> Self {
        match choice {
            PriorityChoice::Untriaged => Self::None,
            PriorityChoice::Low => Self::Low,
            PriorityChoice::Medium => Self::Medium,
            PriorityChoice::High => Self::High,
        }
    }
}

async fn current(ctx: Context<'_>) -> Result<(TicketChannel, Actor), Error> {
    let guild = ctx.guild_id().ok_or("guild only")?;
    let target = TicketChannel::load(ctx.data(), guild, ctx.channel_id())?;
    let member = ctx.author_member().await;
    let actor = Actor::new(ctx.author(), member.as_deref());
    Ok((target, actor))
}

async fn reply(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(CreateReply::default().content(content).ephemeral(true))
        .await?;
    Ok(())
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Manage the ticket of this channel
#[poise::command(
    slash_command,
    guild_only,
    subcommands("close", "add", "remove", "claim", "priority"),
    subcommand_required
)]
pub async fn ticket(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Close this ticket
#[poise::command(slash_command, guild_only)]
pub async fn close(
    ctx: Context<'_>,
    #[description = "Why the ticket is being closed"] reason: Option<String>,
) -> Result<(), Error> {
    let (target, actor) = current(ctx).await?;
    ctx.defer_ephemeral().await?;
    let summary = flow::close_ticket(ctx.serenity_context(), ctx.data(), &target, &actor, reason).await?;
    if target.config.auto_archive_tickets {
        reply(ctx, summary).await?;
    }
    Ok(())
}

/// Give a member access to this ticket
#[poise::command(slash_command, guild_only)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Member to add"] user: serenity::User,
) -> Result<(), Error> {
    let (target, actor) = current(ctx).await?;
    let message = flow::add_member(ctx.serenity_context(), &target, &actor, user.id).await?;
    ctx.say(message).await?;
    Ok(())
}

/// Remove a member from this ticket
#[poise::command(slash_command, guild_only)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Member to remove"] user: serenity::User,
) -> Result<(), Error> {
    let (target, actor) = current(ctx).await?;
    let message = flow::remove_member(ctx.serenity_context(), &target, &actor, user.id).await?;
    ctx.say(message).await?;
    Ok(())
}

/// Take ownership of this ticket
#[poise::command(slash_command, guild_only)]
pub async fn claim(ctx: Context<'_>) -> Result<(), Error> {
    let (target, actor) = current(ctx).await?;
    target.require_staff(&actor)?;

    let staff = user_key(actor.user);
    if target.ticket.claimed_by == Some(staff) {
        return reply(ctx, "You already claimed this ticket.").await;
    }
    ctx.data().store.tickets.update_ticket(
        guild_key(target.guild),
        channel_key(target.channel),
        &object(json!({ "claimed_by": staff })),
    )?;
    info!(channel = %target.channel, staff = %staff, "Ticket claimed");
    ctx.say(format!("<@{staff}> claimed this ticket.")).await?;
    Ok(())
}

/// Set the priority of this ticket
#[poise::command(slash_command, guild_only)]
pub async fn priority(
    ctx: Context<'_>,
    #[description = "New priority"] level: PriorityChoice,
) -> Result<(), Error> {
    let (target, actor) = current(ctx).await?;
    target.require_staff(&actor)?;

    let level = TicketPriority::from(level);
    ctx.data().store.tickets.update_ticket(
        guild_key(target.guild),
        channel_key(target.channel),
        &object(json!({ "priority": level })),
    )?;
    info!(channel = %target.channel, priority = %level, "Ticket priority changed");
    ctx.say(format!("Priority set to **{level}**.")).await?;
    Ok(())
}
