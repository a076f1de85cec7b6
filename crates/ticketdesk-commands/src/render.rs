//! Message builders for panels and ticket channels.

use crate::custom_id::{ComponentAction, PanelEditStep};
use poise::serenity_prelude as serenity;
use serenity::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateMessage, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, ReactionType,
};
use ticketdesk_common::{truncate_string, UserId};
use ticketdesk_store::{GuildConfig, Panel, Ticket};

/// Embed color used when a panel color cannot be parsed.
pub const DEFAULT_COLOR: u32 = 0x0034_98db;

/// Discord allows at most this many options in one dropdown.
pub const MAX_DROPDOWN_OPTIONS: usize = 25;

/// Parses `#rrggbb` or `rrggbb`.
pub fn parse_color(raw: &str) -> Option<u32> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Maps a stored button style name to a Discord style.
pub fn button_style(name: &str) -> ButtonStyle {
    match name.trim().to_ascii_lowercase().as_str() {
        "grey" | "gray" | "secondary" => ButtonStyle::Secondary,
        "green" | "success" => ButtonStyle::Success,
        "red" | "danger" => ButtonStyle::Danger,
        _ => ButtonStyle::Primary,
    }
}

/// Checks a button style name typed by an admin.
pub fn is_known_button_style(name: &str) -> bool {
    matches!(
        name.trim().to_ascii_lowercase().as_str(),
        "blurple" | "primary" | "grey" | "gray" | "secondary" | "green" | "success" | "red" | "danger"
    )
}

fn emoji(raw: Option<&str>) -> Option<ReactionType> {
    raw.map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| ReactionType::Unicode(e.to_string()))
}

fn panel_embed(panel: &Panel) -> CreateEmbed {
    CreateEmbed::new()
        .title(truncate_string(&panel.title, 256))
        .description(truncate_string(&panel.description, 4096))
        .colour(parse_color(&panel.color).unwrap_or(DEFAULT_COLOR))
}

/// Why a panel cannot be posted.
pub fn panel_problem(panel: &Panel) -> Option<String> {
    if panel.use_button {
        return None;
    }
    if panel.dropdown_options.is_empty() {
        return Some("This panel uses a dropdown but has no options yet.".to_string());
    }
    if panel.dropdown_options.len() > MAX_DROPDOWN_OPTIONS {
        return Some(format!(
            "Dropdowns can hold at most {MAX_DROPDOWN_OPTIONS} options."
        ));
    }
    None
}

/// Message members use to open tickets from a panel.
pub fn panel_message(panel_id: &str, panel: &Panel) -> CreateMessage {
    let row = if panel.use_button {
        let mut button = CreateButton::new(
            ComponentAction::OpenTicket {
                panel_id: panel_id.to_string(),
            }
            .to_string(),
        )
        .label(truncate_string(&panel.button_text, 80))
        .style(button_style(&panel.button_style));
        if let Some(emoji) = emoji(panel.button_emoji.as_deref()) {
            button = button.emoji(emoji);
        }
        CreateActionRow::Buttons(vec![button])
    } else {
        let options = panel
            .dropdown_options
            .iter()
            .take(MAX_DROPDOWN_OPTIONS)
            .enumerate()
            .map(|(index, option)| {
                let mut entry =
                    CreateSelectMenuOption::new(truncate_string(&option.label, 100), index.to_string());
                if let Some(description) = option.description.as_deref().filter(|d| !d.is_empty()) {
                    entry = entry.description(truncate_string(description, 100));
                }
                if let Some(emoji) = emoji(option.emoji.as_deref()) {
                    entry = entry.emoji(emoji);
                }
                entry
            })
            .collect();
        let menu = CreateSelectMenu::new(
            ComponentAction::SelectTicket {
                panel_id: panel_id.to_string(),
            }
            .to_string(),
            CreateSelectMenuKind::String { options },
        )
        .placeholder(truncate_string(&panel.dropdown_placeholder, 150));
        CreateActionRow::SelectMenu(menu)
    };

    CreateMessage::new()
        .embed(panel_embed(panel))
        .components(vec![row])
}

/// Preview of a draft shown while it is being edited, with the editor controls.
pub fn draft_preview(panel_id: &str, panel: &Panel) -> (CreateEmbed, Vec<CreateActionRow>) {
    let kind = if panel.use_button {
        format!("Button: {}", panel.button_text)
    } else {
        format!("Dropdown with {} option(s)", panel.dropdown_options.len())
    };
    let embed = panel_embed(panel)
        .field("Panel id", panel_id, true)
        .field("Type", kind, true);

    let controls = vec![
        CreateButton::new(ComponentAction::PanelEdit(PanelEditStep::Button).to_string())
            .label("Use button")
            .style(ButtonStyle::Secondary),
        CreateButton::new(ComponentAction::PanelEdit(PanelEditStep::Dropdown).to_string())
            .label("Use dropdown")
            .style(ButtonStyle::Secondary),
        CreateButton::new(ComponentAction::PanelEdit(PanelEditStep::Save).to_string())
            .label("Save")
            .style(ButtonStyle::Success),
        CreateButton::new(ComponentAction::PanelEdit(PanelEditStep::Cancel).to_string())
            .label("Cancel")
            .style(ButtonStyle::Danger),
    ];
    (embed, vec![CreateActionRow::Buttons(controls)])
}

/// Text of the welcome message posted in a new ticket channel.
pub fn welcome_text(panel: &Panel, creator: UserId) -> String {
    let mut text = panel.welcome_message.clone().unwrap_or_else(|| {
        format!("Welcome <@{creator}>! Describe your issue and the support team will be with you shortly.")
    });
    if let Some(instructions) = panel.instruction_message.as_deref().filter(|i| !i.is_empty()) {
        text.push_str("\n\n");
        text.push_str(instructions);
    }
    text
}

/// Content line above the welcome embed: the creator, plus the support role
/// when the guild wants it notified.
pub fn opening_mentions(config: &GuildConfig, panel: &Panel, creator: UserId) -> String {
    let mut content = format!("<@{creator}>");
    if config.notify_on_open {
        if let Some(role) = panel.support_role_id.filter(|r| r.0 != 0) {
            content.push_str(&format!(" <@&{role}>"));
        }
    }
    content
}

/// Buttons shown under the welcome message.
pub fn ticket_controls(config: &GuildConfig) -> Vec<CreateActionRow> {
    let mut buttons = vec![CreateButton::new(ComponentAction::CloseTicket.to_string())
        .label("Close")
        .style(ButtonStyle::Danger)];
    if config.show_add_user_button {
        buttons.push(
            CreateButton::new(ComponentAction::AddUser.to_string())
                .label("Add user")
                .style(ButtonStyle::Secondary),
        );
    }
    if config.show_remove_user_button {
        buttons.push(
            CreateButton::new(ComponentAction::RemoveUser.to_string())
                .label("Remove user")
                .style(ButtonStyle::Secondary),
        );
    }
    vec![CreateActionRow::Buttons(buttons)]
}

/// Full welcome message of a ticket.
pub fn welcome_message(config: &GuildConfig, panel: &Panel, ticket: &Ticket, creator: UserId) -> CreateMessage {
    let mut embed = CreateEmbed::new()
        .title(format!("Ticket #{}", ticket.ticket_number))
        .description(truncate_string(&welcome_text(panel, creator), 4096))
        .colour(parse_color(&panel.color).unwrap_or(DEFAULT_COLOR));
    if let Some(kind) = ticket.ticket_type.as_deref() {
        embed = embed.field("Type", kind, true);
    }

    CreateMessage::new()
        .content(opening_mentions(config, panel, creator))
        .embed(embed)
        .components(ticket_controls(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketdesk_common::RoleId;
    use ticketdesk_store::DropdownOption;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#3498db"), Some(0x0034_98db));
        assert_eq!(parse_color("FF0000"), Some(0x00ff_0000));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_button_style_names() {
        assert_eq!(button_style("blurple"), ButtonStyle::Primary);
        assert_eq!(button_style("Grey"), ButtonStyle::Secondary);
        assert_eq!(button_style("green"), ButtonStyle::Success);
        assert_eq!(button_style("red"), ButtonStyle::Danger);
        assert_eq!(button_style("sparkly"), ButtonStyle::Primary);
        assert!(!is_known_button_style("sparkly"));
    }

    #[test]
    fn test_panel_problem() {
        let mut panel = Panel::default();
        assert!(panel_problem(&panel).is_none());

        panel.use_button = false;
        assert!(panel_problem(&panel).is_some());

        panel.dropdown_options.push(DropdownOption {
            label: "Billing".to_string(),
            ..DropdownOption::default()
        });
        assert!(panel_problem(&panel).is_none());
    }

    #[test]
    fn test_welcome_text_default_and_instructions() {
        let mut panel = Panel::default();
        assert!(welcome_text(&panel, UserId(7)).starts_with("Welcome <@7>!"));

        panel.welcome_message = Some("Hi there".to_string());
        panel.instruction_message = Some("Attach logs.".to_string());
        assert_eq!(welcome_text(&panel, UserId(7)), "Hi there\n\nAttach logs.");
    }

    #[test]
    fn test_opening_mentions_respects_notify_flag() {
        let mut config = GuildConfig::default();
        let panel = Panel {
            support_role_id: Some(RoleId(42)),
            ..Panel::default()
        };
        assert_eq!(opening_mentions(&config, &panel, UserId(1)), "<@1>");

        config.notify_on_open = true;
        assert_eq!(opening_mentions(&config, &panel, UserId(1)), "<@1> <@&42>");
    }
}
