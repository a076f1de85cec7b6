//! Modal builders and the parsing of their submissions.
//!
//! Submitted values are read into a plain map first so the rules applied to
//! them do not depend on Discord types.

use crate::custom_id::ModalAction;
use crate::render::{is_known_button_style, parse_color, MAX_DROPDOWN_OPTIONS};
use poise::serenity_prelude as serenity;
use serenity::{ActionRowComponent, CreateActionRow, CreateInputText, CreateModal, InputTextStyle};
use std::collections::HashMap;
use ticketdesk_common::{ChannelId, RoleId};
use ticketdesk_store::{DropdownOption, Panel};

/// Values of a submitted modal keyed by input id.
pub type ModalInputs = HashMap<String, String>;

/// Collects the text inputs of a modal submission.
pub fn read_inputs(rows: &[serenity::ActionRow]) -> ModalInputs {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            ActionRowComponent::InputText(input) => Some((
                input.custom_id.clone(),
                input.value.clone().unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

fn text_input(
    style: InputTextStyle,
    label: &str,
    id: &str,
    value: Option<&str>,
    required: bool,
    max_length: u16,
) -> CreateActionRow {
    let mut input = CreateInputText::new(style, label, id)
        .required(required)
        .max_length(max_length);
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        input = input.value(value);
    }
    CreateActionRow::InputText(input)
}

/// First step of the panel editor.
pub fn panel_basics_modal(draft: &Panel) -> CreateModal {
    let role = draft.support_role_id.map(|r| r.to_string());
    let category = draft.category_id.map(|c| c.to_string());
    CreateModal::new(ModalAction::PanelBasics.as_str(), "Panel basics").components(vec![
        text_input(InputTextStyle::Short, "Title", "title", Some(&draft.title), true, 256),
        text_input(
            InputTextStyle::Paragraph,
            "Description",
            "description",
            Some(&draft.description),
            true,
            4000,
        ),
        text_input(InputTextStyle::Short, "Color (#rrggbb)", "color", Some(&draft.color), false, 7),
        text_input(
            InputTextStyle::Short,
            "Support role id",
            "support_role_id",
            role.as_deref(),
            false,
            25,
        ),
        text_input(
            InputTextStyle::Short,
            "Ticket category id",
            "category_id",
            category.as_deref(),
            false,
            25,
        ),
    ])
}

/// Second step of the panel editor for a button panel.
pub fn panel_button_modal(draft: &Panel) -> CreateModal {
    CreateModal::new(ModalAction::PanelButton.as_str(), "Button settings").components(vec![
        text_input(InputTextStyle::Short, "Button text", "button_text", Some(&draft.button_text), true, 80),
        text_input(
            InputTextStyle::Short,
            "Button emoji",
            "button_emoji",
            draft.button_emoji.as_deref(),
            false,
            32,
        ),
        text_input(
            InputTextStyle::Short,
            "Style (blurple, grey, green, red)",
            "button_style",
            Some(&draft.button_style),
            false,
            16,
        ),
        text_input(
            InputTextStyle::Paragraph,
            "Welcome message",
            "welcome_message",
            draft.welcome_message.as_deref(),
            false,
            2000,
        ),
    ])
}

/// Second step of the panel editor for a dropdown panel.
pub fn panel_dropdown_modal(draft: &Panel) -> CreateModal {
    let options = format_dropdown_options(&draft.dropdown_options);
    CreateModal::new(ModalAction::PanelDropdown.as_str(), "Dropdown settings").components(vec![
        text_input(
            InputTextStyle::Short,
            "Placeholder",
            "dropdown_placeholder",
            Some(&draft.dropdown_placeholder),
            false,
            150,
        ),
        text_input(
            InputTextStyle::Paragraph,
            "Options: label | description | emoji",
            "dropdown_options",
            Some(&options),
            true,
            4000,
        ),
        text_input(
            InputTextStyle::Paragraph,
            "Welcome message",
            "welcome_message",
            draft.welcome_message.as_deref(),
            false,
            2000,
        ),
    ])
}

/// Asks for the reason a ticket is being closed.
pub fn close_reason_modal() -> CreateModal {
    CreateModal::new(ModalAction::CloseReason.as_str(), "Close ticket").components(vec![text_input(
        InputTextStyle::Paragraph,
        "Reason",
        "reason",
        None,
        true,
        1000,
    )])
}

/// Asks for the member to add to or remove from a ticket.
pub fn member_modal(action: ModalAction) -> CreateModal {
    let title = if action == ModalAction::RemoveUser {
        "Remove member"
    } else {
        "Add member"
    };
    CreateModal::new(action.as_str(), title).components(vec![text_input(
        InputTextStyle::Short,
        "User id or mention",
        "user",
        None,
        true,
        32,
    )])
}

fn value<'a>(inputs: &'a ModalInputs, key: &str) -> Option<&'a str> {
    inputs.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_optional_id(raw: Option<&str>, what: &str) -> Result<Option<u64>, String> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let digits = raw.trim_start_matches("<@&").trim_start_matches("<#").trim_end_matches('>');
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => Err(format!("'{raw}' is not a valid {what} id.")),
        Ok(id) => Ok(Some(id)),
    }
}

/// Applies the basics step to a draft.
pub fn apply_basics(draft: &mut Panel, inputs: &ModalInputs) -> Result<(), String> {
    let color = match value(inputs, "color") {
        Some(raw) if parse_color(raw).is_none() => {
            return Err(format!("'{raw}' is not a color. Use the #rrggbb form."));
        }
        Some(raw) => format!("#{}", raw.trim_start_matches('#').to_ascii_lowercase()),
        None => draft.color.clone(),
    };
    let role = parse_optional_id(value(inputs, "support_role_id"), "role")?;
    let category = parse_optional_id(value(inputs, "category_id"), "category")?;

    if let Some(title) = value(inputs, "title") {
        draft.title = title.to_string();
        draft.panel_name = title.to_string();
    }
    if let Some(description) = value(inputs, "description") {
        draft.description = description.to_string();
    }
    draft.color = color;
    draft.support_role_id = role.map(RoleId);
    draft.category_id = category.map(ChannelId);
    Ok(())
}

/// Applies the button step to a draft and switches it to button mode.
pub fn apply_button(draft: &mut Panel, inputs: &ModalInputs) -> Result<(), String> {
    if let Some(style) = value(inputs, "button_style") {
        if !is_known_button_style(style) {
            return Err(format!(
                "'{style}' is not a button style. Use blurple, grey, green or red."
            ));
        }
        draft.button_style = style.to_ascii_lowercase();
    }
    if let Some(text) = value(inputs, "button_text") {
        draft.button_text = text.to_string();
    }
    draft.button_emoji = value(inputs, "button_emoji").map(str::to_string);
    draft.welcome_message = value(inputs, "welcome_message").map(str::to_string);
    draft.use_button = true;
    Ok(())
}

/// Applies the dropdown step to a draft and switches it to dropdown mode.
pub fn apply_dropdown(draft: &mut Panel, inputs: &ModalInputs) -> Result<(), String> {
    let options = parse_dropdown_options(value(inputs, "dropdown_options").unwrap_or_default())?;
    if let Some(placeholder) = value(inputs, "dropdown_placeholder") {
        draft.dropdown_placeholder = placeholder.to_string();
    }
    draft.dropdown_options = options;
    draft.welcome_message = value(inputs, "welcome_message").map(str::to_string);
    draft.use_button = false;
    Ok(())
}

/// Parses one option per line as `label | description | emoji`.
pub fn parse_dropdown_options(raw: &str) -> Result<Vec<DropdownOption>, String> {
    let options: Vec<DropdownOption> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut parts = line.split('|').map(str::trim);
            let label = parts.next().unwrap_or_default().to_string();
            let description = parts.next().filter(|d| !d.is_empty()).map(str::to_string);
            let emoji = parts.next().filter(|e| !e.is_empty()).map(str::to_string);
            DropdownOption {
                label,
                description,
                emoji,
            }
        })
        .collect();

    if options.is_empty() {
        return Err("Add at least one dropdown option.".to_string());
    }
    if options.len() > MAX_DROPDOWN_OPTIONS {
        return Err(format!(
            "Dropdowns can hold at most {MAX_DROPDOWN_OPTIONS} options."
        ));
    }
    if options.iter().any(|o| o.label.is_empty()) {
        return Err("Every dropdown option needs a label.".to_string());
    }
    Ok(options)
}

/// Inverse of [`parse_dropdown_options`], used to prefill the modal.
pub fn format_dropdown_options(options: &[DropdownOption]) -> String {
    options
        .iter()
        .map(|option| {
            let mut line = option.label.clone();
            if option.description.is_some() || option.emoji.is_some() {
                line.push_str(" | ");
                line.push_str(option.description.as_deref().unwrap_or_default());
            }
            if let Some(emoji) = &option.emoji {
                line.push_str(" | ");
                line.push_str(emoji);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
