//! Custom ids carried by buttons, dropdowns and modals.
//!
//! Ids are `:`-separated, for example `ticket:open:support`. Parsing is the
//! only place that knows the layout.

use std::fmt;

/// Longest panel id accepted, so every custom id stays under Discord's
/// 100 character limit.
pub const MAX_PANEL_ID_LEN: usize = 50;

/// Steps of the panel editor reachable from its buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEditStep {
    /// Configure the panel as a single button.
    Button,
    /// Configure the panel as a dropdown.
    Dropdown,
    /// Save the draft.
    Save,
    /// Discard the draft.
    Cancel,
}

/// Action behind a clicked button or a dropdown selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentAction {
    /// Panel button: open a ticket.
    OpenTicket {
        /// Panel the button belongs to.
        panel_id: String,
    },
    /// Panel dropdown: open a ticket of the selected type.
    SelectTicket {
        /// Panel the dropdown belongs to.
        panel_id: String,
    },
    /// Close the ticket of the current channel.
    CloseTicket,
    /// Ask for a member to add to the ticket.
    AddUser,
    /// Ask for a member to remove from the ticket.
    RemoveUser,
    /// Panel editor navigation.
    PanelEdit(PanelEditStep),
}

impl ComponentAction {
    /// Parses a component custom id. Unknown ids yield `None`.
    pub fn parse(custom_id: &str) -> Option<Self> {
        let mut parts = custom_id.splitn(3, ':');
        let scope = parts.next()?;
        let action = parts.next()?;
        let rest = parts.next();

        match (scope, action, rest) {
            ("ticket", "open", Some(panel)) if !panel.is_empty() => Some(Self::OpenTicket {
                panel_id: panel.to_string(),
            }),
            ("ticket", "select", Some(panel)) if !panel.is_empty() => Some(Self::SelectTicket {
                panel_id: panel.to_string(),
            }),
            ("ticket", "close", None) => Some(Self::CloseTicket),
            ("ticket", "add_user", None) => Some(Self::AddUser),
            ("ticket", "remove_user", None) => Some(Self::RemoveUser),
            ("panel_edit", step, None) => match step {
                "button" => Some(Self::PanelEdit(PanelEditStep::Button)),
                "dropdown" => Some(Self::PanelEdit(PanelEditStep::Dropdown)),
                "save" => Some(Self::PanelEdit(PanelEditStep::Save)),
                "cancel" => Some(Self::PanelEdit(PanelEditStep::Cancel)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for ComponentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenTicket { panel_id } => write!(f, "ticket:open:{panel_id}"),
            Self::SelectTicket { panel_id } => write!(f, "ticket:select:{panel_id}"),
            Self::CloseTicket => f.write_str("ticket:close"),
            Self::AddUser => f.write_str("ticket:add_user"),
            Self::RemoveUser => f.write_str("ticket:remove_user"),
            Self::PanelEdit(PanelEditStep::Button) => f.write_str("panel_edit:button"),
            Self::PanelEdit(PanelEditStep::Dropdown) => f.write_str("panel_edit:dropdown"),
            Self::PanelEdit(PanelEditStep::Save) => f.write_str("panel_edit:save"),
            Self::PanelEdit(PanelEditStep::Cancel) => f.write_str("panel_edit:cancel"),
        }
    }
}

/// Modal whose submission is being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Title, description, color, role and category of a panel draft.
    PanelBasics,
    /// Button settings of a panel draft.
    PanelButton,
    /// Dropdown settings of a panel draft.
    PanelDropdown,
    /// Reason for closing a ticket.
    CloseReason,
    /// Member to add to a ticket.
    AddUser,
    /// Member to remove from a ticket.
    RemoveUser,
}

impl ModalAction {
    /// Parses a modal custom id.
    pub fn parse(custom_id: &str) -> Option<Self> {
        match custom_id {
            "panel_edit:basics" => Some(Self::PanelBasics),
            "panel_edit:button" => Some(Self::PanelButton),
            "panel_edit:dropdown" => Some(Self::PanelDropdown),
            "ticket:close_reason" => Some(Self::CloseReason),
            "ticket:add_user" => Some(Self::AddUser),
            "ticket:remove_user" => Some(Self::RemoveUser),
            _ => None,
        }
    }

    /// Custom id sent with the modal.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PanelBasics => "panel_edit:basics",
            Self::PanelButton => "panel_edit:button",
            Self::PanelDropdown => "panel_edit:dropdown",
            Self::CloseReason => "ticket:close_reason",
            Self::AddUser => "ticket:add_user",
            Self::RemoveUser => "ticket:remove_user",
        }
    }
}

/// Checks a panel id typed by an admin.
///
/// Ids are lowercase ASCII letters, digits, `-` and `_`.
pub fn validate_panel_id(panel_id: &str) -> Result<(), String> {
    if panel_id.is_empty() || panel_id.len() > MAX_PANEL_ID_LEN {
        return Err(format!(
            "Panel ids must be between 1 and {MAX_PANEL_ID_LEN} characters."
        ));
    }
    if !panel_id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err("Panel ids may only contain lowercase letters, digits, '-' and '_'.".to_string());
    }
    Ok(())
}
