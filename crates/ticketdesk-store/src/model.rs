//! Records persisted in the JSON documents and their partial-update rules.

use crate::StoreError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ticketdesk_common::{ticket_channel_name, ChannelId, RoleId, UserId};

/// Field map carried by a partial update.
pub type Fields = Map<String, Value>;

/// Which keys a partial update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyPolicy {
    /// Only keys already present on the serialized record.
    KnownOnly,
    /// Any key, including ones the record type does not model.
    Any,
}

/// Merges `fields` into `current` and returns the updated record plus the keys
/// that were skipped.
///
/// Values are checked one key at a time so a type mismatch names its field.
fn merge_fields<T>(
    current: &T,
    fields: &Fields,
    policy: KeyPolicy,
    protected: &[&str],
) -> Result<(T, Vec<String>), StoreError>
where
    T: Serialize + DeserializeOwned,
{
    let mut object = match serde_json::to_value(current)? {
        Value::Object(object) => object,
        _ => return Err(StoreError::invalid_field("", "record is not a JSON object")),
    };

    let mut ignored = Vec::new();
    for (key, value) in fields {
        let recognized = object.contains_key(key);
        if protected.contains(&key.as_str()) || (policy == KeyPolicy::KnownOnly && !recognized) {
            ignored.push(key.clone());
            continue;
        }

        let mut candidate = object.clone();
        candidate.insert(key.clone(), value.clone());
        if let Err(e) = serde_json::from_value::<T>(Value::Object(candidate)) {
            return Err(StoreError::invalid_field(key, e.to_string()));
        }
        object.insert(key.clone(), value.clone());
    }

    let updated = serde_json::from_value(Value::Object(object))?;
    Ok((updated, ignored))
}

/// Per-guild settings, with the guild's panels and tickets embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuildConfig {
    /// Number the next ticket will receive.
    pub next_ticket_number: u64,
    /// Show the "add user" button inside tickets.
    pub show_add_user_button: bool,
    /// Show the "remove user" button inside tickets.
    pub show_remove_user_button: bool,
    /// Maximum open tickets per member.
    pub max_tickets_per_user: u32,
    /// Whether the ticket creator may close the ticket.
    pub can_members_close: bool,
    /// Hours of inactivity before a ticket is considered stale; 0 disables.
    pub inactivity_time: u32,
    /// Archive closed tickets instead of deleting them.
    pub auto_archive_tickets: bool,
    /// Ask for a reason when closing.
    pub require_close_reason: bool,
    /// Ping the support role when a ticket opens.
    pub notify_on_open: bool,
    /// Channel name template containing `{number}`.
    pub ticket_format: String,
    /// Panels keyed by panel id.
    pub panels: BTreeMap<String, Panel>,
    /// Tickets keyed by the id of the channel hosting them.
    pub tickets: BTreeMap<String, Ticket>,
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            next_ticket_number: 1,
            show_add_user_button: true,
            show_remove_user_button: true,
            max_tickets_per_user: 1,
            can_members_close: true,
            inactivity_time: 0,
            auto_archive_tickets: false,
            require_close_reason: true,
            notify_on_open: false,
            ticket_format: "ticket-{number}".to_string(),
            panels: BTreeMap::new(),
            tickets: BTreeMap::new(),
        }
    }
}

impl GuildConfig {
    /// Applies a partial update.
    ///
    /// Keys that are not fields of the record are skipped and returned.
    /// A value of the wrong type rejects the whole update and leaves `self`
    /// untouched.
    pub fn apply_update(&mut self, fields: &Fields) -> Result<Vec<String>, StoreError> {
        let (updated, ignored) = merge_fields(self, fields, KeyPolicy::KnownOnly, &[])?;
        *self = updated;
        Ok(ignored)
    }

    /// Channel name for a ticket with the given number.
    pub fn channel_name(&self, number: u64) -> String {
        ticket_channel_name(&self.ticket_format, number)
    }

    /// Ticket hosted by a channel.
    pub fn ticket(&self, channel: ChannelId) -> Option<&Ticket> {
        self.tickets.get(&channel.to_string())
    }
}

/// One entry of a dropdown panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownOption {
    /// Text shown in the menu; also becomes the ticket type.
    pub label: String,
    /// Secondary text.
    pub description: Option<String>,
    /// Emoji shown next to the label.
    pub emoji: Option<String>,
}

/// A message members use to open tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Panel {
    /// Name shown in listings.
    pub panel_name: String,
    /// Embed title.
    pub title: String,
    /// Embed description.
    pub description: String,
    /// Embed color as `#rrggbb`.
    pub color: String,
    /// Role given access to tickets opened from this panel.
    pub support_role_id: Option<RoleId>,
    /// Category new ticket channels are created under.
    pub category_id: Option<ChannelId>,
    /// Single button when true, dropdown otherwise.
    pub use_button: bool,
    /// One of `blurple`, `grey`, `green`, `red`.
    pub button_style: String,
    /// Emoji on the button.
    pub button_emoji: Option<String>,
    /// Button label.
    pub button_text: String,
    /// Placeholder shown on the dropdown.
    pub dropdown_placeholder: String,
    /// Dropdown entries.
    pub dropdown_options: Vec<DropdownOption>,
    /// Message posted when a ticket opens.
    pub welcome_message: Option<String>,
    /// Follow-up instructions posted with the welcome message.
    pub instruction_message: Option<String>,
    /// Keys this version does not model, kept as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            panel_name: "Unnamed panel".to_string(),
            title: "Support".to_string(),
            description: "Click the button below to open a ticket.".to_string(),
            color: "#3498db".to_string(),
            support_role_id: None,
            category_id: None,
            use_button: true,
            button_style: "blurple".to_string(),
            button_emoji: None,
            button_text: "Open Ticket".to_string(),
            dropdown_placeholder: "Select a reason".to_string(),
            dropdown_options: Vec::new(),
            welcome_message: None,
            instruction_message: None,
            extra: Map::new(),
        }
    }
}

impl Panel {
    /// Applies a partial update. Panels are freeform, so every key is accepted.
    pub fn apply_update(&mut self, fields: &Fields) -> Result<(), StoreError> {
        let (updated, _) = merge_fields(self, fields, KeyPolicy::Any, &[])?;
        *self = updated;
        Ok(())
    }
}

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Accepting messages.
    #[default]
    Open,
    /// Closed but not archived.
    Closed,
    /// Closed and kept read-only.
    Archived,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Archived => "archived",
        })
    }
}

/// Triage priority set by staff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    /// Not triaged.
    #[default]
    None,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

impl FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// A support ticket hosted in its own channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticket {
    /// Member who opened the ticket.
    pub creator_id: Option<UserId>,
    /// Panel the ticket was opened from. Not checked against existing panels.
    pub panel_id: Option<String>,
    /// Per-guild sequence number; 0 means "assign on create".
    pub ticket_number: u64,
    /// Dropdown option chosen when opening, if any.
    pub ticket_type: Option<String>,
    /// Lifecycle state.
    pub status: TicketStatus,
    /// Staff member handling the ticket.
    pub claimed_by: Option<UserId>,
    /// Triage priority.
    pub priority: TicketPriority,
    /// Reason given when the ticket was closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<String>,
    /// Keys this version does not model, kept as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Ticket {
    fn default() -> Self {
        Self {
            creator_id: None,
            panel_id: None,
            ticket_number: 0,
            ticket_type: None,
            status: TicketStatus::Open,
            claimed_by: None,
            priority: TicketPriority::None,
            close_reason: None,
            extra: Map::new(),
        }
    }
}

impl Ticket {
    /// A fresh open ticket for `creator`, numbered on create.
    pub fn opened_by(creator: UserId, panel_id: impl Into<String>) -> Self {
        Self {
            creator_id: Some(creator),
            panel_id: Some(panel_id.into()),
            ..Self::default()
        }
    }

    /// Whether the ticket is open and belongs to `user`.
    pub fn is_open_for(&self, user: UserId) -> bool {
        self.creator_id == Some(user) && self.status == TicketStatus::Open
    }

    /// Applies a partial update.
    ///
    /// Every key is accepted except `ticket_number`, which never changes once
    /// assigned. Skipped keys are returned.
    pub fn apply_update(&mut self, fields: &Fields) -> Result<Vec<String>, StoreError> {
        let (updated, ignored) = merge_fields(self, fields, KeyPolicy::Any, &["ticket_number"])?;
        *self = updated;
        Ok(ignored)
    }
}

/// A panel draft being composed over several interactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditSession {
    /// The draft.
    #[serde(default)]
    pub panel_data: Panel,
    /// Id the draft is saved under when finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_id: Option<String>,
}

impl EditSession {
    /// A session editing `draft` destined for `panel_id`.
    pub fn new(panel_id: impl Into<String>, draft: Panel) -> Self {
        Self {
            panel_data: draft,
            panel_id: Some(panel_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be an object"),
        }
    }

    #[test]
    fn test_guild_config_ignores_unknown_keys() {
        let mut config = GuildConfig::default();
        let ignored = config
            .apply_update(&fields(json!({"foo": 1, "notify_on_open": true})))
            .unwrap();

        assert_eq!(ignored, vec!["foo".to_string()]);
        assert!(config.notify_on_open);
        let raw = serde_json::to_value(&config).unwrap();
        assert!(raw.get("foo").is_none());
    }

    #[test]
    fn test_guild_config_type_mismatch_leaves_record() {
        let mut config = GuildConfig::default();
        let err = config
            .apply_update(&fields(json!({"ticket_format": "t-{number}", "max_tickets_per_user": "many"})))
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidField { ref field, .. } if field == "max_tickets_per_user"));
        assert_eq!(config, GuildConfig::default());
    }

    #[test]
    fn test_panel_keeps_unknown_keys() {
        let mut panel = Panel::default();
        panel
            .apply_update(&fields(json!({"title": "Billing", "banner_url": "https://x/y.png"})))
            .unwrap();

        assert_eq!(panel.title, "Billing");
        assert_eq!(panel.extra.get("banner_url"), Some(&json!("https://x/y.png")));

        let raw = serde_json::to_value(&panel).unwrap();
        assert_eq!(raw["banner_url"], json!("https://x/y.png"));
    }

    #[test]
    fn test_ticket_number_is_protected() {
        let mut ticket = Ticket {
            ticket_number: 4,
            ..Ticket::default()
        };
        let ignored = ticket
            .apply_update(&fields(json!({"ticket_number": 99, "status": "closed"})))
            .unwrap();

        assert_eq!(ignored, vec!["ticket_number".to_string()]);
        assert_eq!(ticket.ticket_number, 4);
        assert_eq!(ticket.status, TicketStatus::Closed);
    }

    #[test]
    fn test_ticket_rejects_unknown_status() {
        let mut ticket = Ticket::default();
        let err = ticket
            .apply_update(&fields(json!({"status": "frozen"})))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidField { ref field, .. } if field == "status"));
    }

    #[test]
    fn test_default_ticket_layout() {
        let raw = serde_json::to_value(Ticket::default()).unwrap();
        assert_eq!(
            raw,
            json!({
                "creator_id": null,
                "panel_id": null,
                "ticket_number": 0,
                "ticket_type": null,
                "status": "open",
                "claimed_by": null,
                "priority": "none"
            })
        );
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("High".parse::<TicketPriority>().unwrap(), TicketPriority::High);
        assert!("urgent".parse::<TicketPriority>().is_err());
    }
}
