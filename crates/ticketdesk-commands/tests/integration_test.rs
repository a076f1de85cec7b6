//! Integration tests for the ticketdesk-commands crate.
//!
//! These drive the panel editor and settings paths against a real store in a
//! temporary directory, without a Discord connection.

use std::collections::HashMap;
use ticketdesk_commands::custom_id::{ComponentAction, ModalAction, PanelEditStep};
use ticketdesk_commands::modals::{apply_basics, apply_dropdown, ModalInputs};
use ticketdesk_commands::render::panel_problem;
use ticketdesk_commands::settings::{coerce_setting, SettingInput};
use ticketdesk_common::{GuildId, UserId};
use ticketdesk_store::{EditSession, Panel, Store};

#[cfg(feature = "testing")]
use ticketdesk_common::test_utils::init_test_logging;

fn inputs(pairs: &[(&str, &str)]) -> ModalInputs {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect::<HashMap<_, _>>()
}

#[test]
fn test_panel_editor_session_to_saved_panel() {
    #[cfg(feature = "testing")]
    init_test_logging();

    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let (user, guild) = (UserId(5), GuildId(6));

    store
        .sessions
        .create(user, guild, &EditSession::new("support", Panel::default()))
        .unwrap();

    let mut draft = store.sessions.get(user, guild).unwrap().panel_data;
    apply_basics(
        &mut draft,
        &inputs(&[("title", "Help desk"), ("description", "Ask us"), ("color", "#FF0000")]),
    )
    .unwrap();
    store.sessions.update(user, guild, draft).unwrap();

    let mut draft = store.sessions.get(user, guild).unwrap().panel_data;
    apply_dropdown(
        &mut draft,
        &inputs(&[("dropdown_options", "Billing | Invoices\nBug report")]),
    )
    .unwrap();
    store.sessions.update(user, guild, draft).unwrap();

    let session = store.sessions.get(user, guild).unwrap();
    assert_eq!(session.panel_id.as_deref(), Some("support"));
    assert!(panel_problem(&session.panel_data).is_none());

    store
        .panels
        .create_panel(guild, "support", session.panel_data)
        .unwrap();
    assert!(store.sessions.delete(user, guild).unwrap());

    let saved = store.panels.get_panel(guild, "support").unwrap();
    assert_eq!(saved.title, "Help desk");
    assert_eq!(saved.color, "#ff0000");
    assert!(!saved.use_button);
    assert_eq!(saved.dropdown_options.len(), 2);
    assert_eq!(saved.dropdown_options[0].description.as_deref(), Some("Invoices"));
}

#[test]
fn test_rejected_modal_input_leaves_session_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let (user, guild) = (UserId(1), GuildId(2));
    store
        .sessions
        .create(user, guild, &EditSession::new("p", Panel::default()))
        .unwrap();

    let mut draft = store.sessions.get(user, guild).unwrap().panel_data;
    assert!(apply_basics(&mut draft, &inputs(&[("color", "blue")])).is_err());

    let stored = store.sessions.get(user, guild).unwrap().panel_data;
    assert_eq!(stored, Panel::default());
}

#[test]
fn test_settings_set_path_updates_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let guild = GuildId(77);
    let config = store.guilds.get_config(guild);

    let SettingInput::Value(value) = coerce_setting(&config, "max_tickets_per_user", "3").unwrap()
    else {
        panic!("max_tickets_per_user should be a known setting");
    };
    let mut fields = serde_json::Map::new();
    fields.insert("max_tickets_per_user".to_string(), value);
    let ignored = store.guilds.update_config(guild, &fields).unwrap();

    assert!(ignored.is_empty());
    assert_eq!(store.guilds.get_config(guild).max_tickets_per_user, 3);
    assert_eq!(
        coerce_setting(&config, "no_such_setting", "1").unwrap(),
        SettingInput::Unknown
    );
}

#[test]
fn test_custom_ids_route_to_actions() {
    assert_eq!(
        ComponentAction::parse("ticket:open:support"),
        Some(ComponentAction::OpenTicket {
            panel_id: "support".to_string()
        })
    );
    assert_eq!(
        ComponentAction::parse("panel_edit:save"),
        Some(ComponentAction::PanelEdit(PanelEditStep::Save))
    );
    assert_eq!(
        ModalAction::parse("ticket:close_reason"),
        Some(ModalAction::CloseReason)
    );
    assert_eq!(ComponentAction::parse("something:else"), None);
}
