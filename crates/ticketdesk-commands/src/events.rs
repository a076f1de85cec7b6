//! Gateway event handling and the framework error hook.

use crate::convert::guild_key;
use crate::framework::{user_message, Data, Error};
use crate::interactions;
use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

/// Reply sent when a member lacks the permissions a command requires.
pub const MISSING_PERMISSIONS_REPLY: &str = "You do not have permission to use this command!";

/// Handles gateway events that poise does not consume itself.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if *is_new == Some(true) {
                data.store.guilds.initialize(guild_key(guild.id));
                info!(guild = %guild.id, name = %guild.name, "Joined guild, settings initialized");
            }
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            interactions::dispatch(ctx, data, interaction).await;
        }
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(user = %data_about_bot.user.name, guilds = data_about_bot.guilds.len(), "Bot ready");
        }
        _ => {}
    }
    Ok(())
}

async fn reply_ephemeral(ctx: crate::Context<'_>, content: String) {
    let reply = poise::CreateReply::default().content(content).ephemeral(true);
    if let Err(e) = ctx.send(reply).await {
        warn!(error = %e, "Failed to send error reply");
    }
}

/// Logs framework errors and tells the member what went wrong.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!(error = %error, "Failed to start bot");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().qualified_name, error = %error, "Command failed");
            reply_ephemeral(ctx, user_message(&error)).await;
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            reply_ephemeral(ctx, MISSING_PERMISSIONS_REPLY.to_string()).await;
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(event = event.snake_case_name(), error = %error, "Event handler failed");
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!(error = %e, "Failed to handle framework error");
            }
        }
    }
}
