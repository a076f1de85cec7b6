//! `/panel`: create, list, delete and post ticket panels.

use crate::convert::{guild_key, user_key};
use crate::custom_id::validate_panel_id;
use crate::framework::{Context, Error};
use crate::modals::panel_basics_modal;
use crate::render::{panel_message, panel_problem};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use std::sync::atomic::Ordering;
use ticketdesk_common::TicketDeskError;
use ticketdesk_store::{EditSession, Panel};
use tracing::info;

/// Manage ticket panels
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    subcommands("create", "list", "delete", "send"),
    subcommand_required
)]
pub async fn panel(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Create a panel, or edit it if the id already exists
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn create(
    ctx: Context<'_>,
    #[description = "Short id such as support or billing"] panel_id: String,
) -> Result<(), Error> {
    let poise::Context::Application(app) = ctx else {
        return Err("slash only".into());
    };
    let guild = guild_key(ctx.guild_id().ok_or("guild only")?);
    let panel_id = panel_id.trim().to_string();
    validate_panel_id(&panel_id).map_err(TicketDeskError::validation)?;

    let store = &ctx.data().store;
    let draft = store.panels.get_panel(guild, &panel_id).unwrap_or_default();
    store.sessions.create(
        user_key(ctx.author().id),
        guild,
        &EditSession::new(panel_id.as_str(), draft.clone()),
    )?;

    app.interaction
        .create_response(
            ctx.serenity_context(),
            serenity::CreateInteractionResponse::Modal(panel_basics_modal(&draft)),
        )
        .await?;
    app.has_sent_initial_response.store(true, Ordering::SeqCst);
    info!(guild = %guild, panel_id = %panel_id, user = %ctx.author().id, "Panel editor opened");
    Ok(())
}

/// Formats the panel listing.
pub fn describe_panels<'a>(panels: impl IntoIterator<Item = (&'a String, &'a Panel)>) -> String {
    let lines: Vec<String> = panels
        .into_iter()
        .map(|(id, panel)| {
            let kind = if panel.use_button {
                "button".to_string()
            } else {
                format!("dropdown, {} option(s)", panel.dropdown_options.len())
            };
            format!("`{id}`: {} ({kind})", panel.title)
        })
        .collect();
    if lines.is_empty() {
        "No panels yet. Create one with /panel create.".to_string()
    } else {
        lines.join("\n")
    }
}

/// List the panels of this server
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let guild = guild_key(ctx.guild_id().ok_or("guild only")?);
    let panels = ctx.data().store.panels.list_panels(guild);
    ctx.send(
        CreateReply::default()
            .content(describe_panels(&panels))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Delete a panel
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Id of the panel"] panel_id: String,
) -> Result<(), Error> {
    let guild = guild_key(ctx.guild_id().ok_or("guild only")?);
    let removed = ctx.data().store.panels.delete_panel(guild, panel_id.trim())?;
    let reply = if removed {
        info!(guild = %guild, panel_id = %panel_id, "Panel deleted");
        format!("Panel `{}` deleted.", panel_id.trim())
    } else {
        format!("There is no panel `{}`.", panel_id.trim())
    };
    ctx.send(CreateReply::default().content(reply).ephemeral(true))
        .await?;
    Ok(())
}

/// Post a panel so members can open tickets
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn send(
    ctx: Context<'_>,
    #[description = "Id of the panel"] panel_id: String,
    #[description = "Channel to post in, defaults to this one"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let guild = guild_key(ctx.guild_id().ok_or("guild only")?);
    let panel_id = panel_id.trim();
    let panel = ctx
        .data()
        .store
        .panels
        .get_panel(guild, panel_id)
        .ok_or_else(|| TicketDeskError::validation(format!("There is no panel `{panel_id}`.")))?;
    if let Some(problem) = panel_problem(&panel) {
        return Err(TicketDeskError::validation(problem).into());
    }

    let target = channel.map_or_else(|| ctx.channel_id(), |c| c.id);
    target
        .send_message(ctx.serenity_context(), panel_message(panel_id, &panel))
        .await?;
    info!(guild = %guild, panel_id, channel = %target, "Panel posted");

    ctx.send(
        CreateReply::default()
            .content(format!("Panel `{panel_id}` posted in <#{target}>."))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_describe_panels() {
        let mut panels = BTreeMap::new();
        assert!(describe_panels(&panels).starts_with("No panels yet"));

        panels.insert("support".to_string(), Panel::default());
        panels.insert(
            "billing".to_string(),
            Panel {
                title: "Billing".to_string(),
                use_button: false,
                ..Panel::default()
            },
        );
        assert_eq!(
            describe_panels(&panels),
            "`billing`: Billing (dropdown, 0 option(s))\n`support`: Support (button)"
        );
    }
}
