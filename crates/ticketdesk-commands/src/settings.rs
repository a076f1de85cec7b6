//! `/settings`: view and change a guild's ticket settings.

use crate::convert::guild_key;
use crate::framework::{Context, Error};
use poise::CreateReply;
use serde_json::{Map, Value};
use ticketdesk_common::TicketDeskError;
use ticketdesk_store::GuildConfig;
use tracing::info;

/// Keys that belong to other commands and cannot be set directly.
const RESERVED: &[&str] = &["panels", "tickets"];

/// Outcome of interpreting `/settings set` input.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingInput {
    /// A value typed to match the field.
    Value(Value),
    /// The guild config has no such field.
    Unknown,
}

/// Interprets a raw value according to the current type of `field`.
pub fn coerce_setting(config: &GuildConfig, field: &str, raw: &str) -> Result<SettingInput, String> {
    if RESERVED.contains(&field) {
        return Err(format!("`{field}` is managed with the /panel and /ticket commands."));
    }
    let current = serde_json::to_value(config).map_err(|e| e.to_string())?;
    let Some(existing) = current.get(field) else {
        return Ok(SettingInput::Unknown);
    };

    let raw = raw.trim();
    let value = match existing {
        Value::Bool(_) => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Value::Bool(true),
            "false" | "no" | "off" | "0" => Value::Bool(false),
            _ => return Err(format!("`{field}` expects true or false.")),
        },
        Value::Number(_) => raw
            .parse::<u64>()
            .map(Value::from)
            .map_err(|_| format!("`{field}` expects a whole number."))?,
        _ => Value::String(raw.to_string()),
    };
    Ok(SettingInput::Value(value))
}

/// Human readable listing of the settings.
pub fn describe_settings(config: &GuildConfig) -> String {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    let inactivity = if config.inactivity_time == 0 {
        "disabled".to_string()
    } else {
        format!("{} hour(s)", config.inactivity_time)
    };
    format!(
        "**Ticket settings**\n\
         next_ticket_number: {}\n\
         ticket_format: `{}`\n\
         max_tickets_per_user: {}\n\
         can_members_close: {}\n\
         require_close_reason: {}\n\
         auto_archive_tickets: {}\n\
         notify_on_open: {}\n\
         show_add_user_button: {}\n\
         show_remove_user_button: {}\n\
         inactivity_time: {}\n\
         panels: {}, tickets: {}",
        config.next_ticket_number,
        config.ticket_format,
        config.max_tickets_per_user,
        yes_no(config.can_members_close),
        yes_no(config.require_close_reason),
        yes_no(config.auto_archive_tickets),
        yes_no(config.notify_on_open),
        yes_no(config.show_add_user_button),
        yes_no(config.show_remove_user_button),
        inactivity,
        config.panels.len(),
        config.tickets.len(),
    )
}

/// Ticket settings of this server
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    subcommands("view", "set"),
    subcommand_required
)]
pub async fn settings(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Show the ticket settings
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn view(ctx: Context<'_>) -> Result<(), Error> {
    let guild = ctx.guild_id().ok_or("guild only")?;
    let config = ctx.data().store.guilds.get_config(guild_key(guild));
    ctx.send(
        CreateReply::default()
            .content(describe_settings(&config))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Change one ticket setting
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Setting name, as shown by /settings view"] field: String,
    #[description = "New value"] value: String,
) -> Result<(), Error> {
    let guild = guild_key(ctx.guild_id().ok_or("guild only")?);
    let store = &ctx.data().store;
    let field = field.trim().to_ascii_lowercase();

    let config = store.guilds.get_config(guild);
    let input = coerce_setting(&config, &field, &value).map_err(TicketDeskError::validation)?;

    let reply = match input {
        SettingInput::Unknown => format!("Unknown setting `{field}`, nothing was changed."),
        SettingInput::Value(parsed) => {
            let mut fields = Map::new();
            fields.insert(field.clone(), parsed.clone());
            store.guilds.update_config(guild, &fields)?;
            info!(guild = %guild, field = %field, value = %parsed, user = %ctx.author().id, "Setting changed");
            format!("`{field}` is now `{parsed}`.")
        }
    };

    ctx.send(CreateReply::default().content(reply).ephemeral(true))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_by_field_type() {
        let config = GuildConfig::default();
        assert_eq!(
            coerce_setting(&config, "notify_on_open", "Yes").unwrap(),
            SettingInput::Value(Value::Bool(true))
        );
        assert_eq!(
            coerce_setting(&config, "max_tickets_per_user", "3").unwrap(),
            SettingInput::Value(Value::from(3u64))
        );
        assert_eq!(
            coerce_setting(&config, "ticket_format", "help-{number}").unwrap(),
            SettingInput::Value(Value::String("help-{number}".to_string()))
        );
    }

    #[test]
    fn test_coerce_rejects_bad_values() {
        let config = GuildConfig::default();
        assert!(coerce_setting(&config, "notify_on_open", "maybe").is_err());
        assert!(coerce_setting(&config, "inactivity_time", "-1").is_err());
        assert!(coerce_setting(&config, "panels", "{}").is_err());
    }

    #[test]
    fn test_unknown_field() {
        let config = GuildConfig::default();
        assert_eq!(
            coerce_setting(&config, "colour", "red").unwrap(),
            SettingInput::Unknown
        );
    }

    #[test]
    fn test_describe_settings() {
        let text = describe_settings(&GuildConfig::default());
        assert!(text.contains("ticket_format: `ticket-{number}`"));
        assert!(text.contains("inactivity_time: disabled"));
    }
}
