//! Integration tests for the ticketdesk repositories against a real data directory.

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use ticketdesk_common::test_utils::{discord_fixtures, init_test_logging, property_testing};
use ticketdesk_common::{ChannelId, GuildId, UserId};
use ticketdesk_store::document::CONFIGS_KEY;
use ticketdesk_store::{
    DocumentStore, EditSession, GuildConfig, Panel, Store, Ticket, TicketStatus,
};

fn open_store() -> (tempfile::TempDir, Store) {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    (dir, store)
}

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

mod guild_config {
    use super::*;

    #[test]
    fn test_first_access_persists_defaults() {
        let (dir, store) = open_store();
        let guild = discord_fixtures::test_guild_id();

        let config = store.guilds.get_config(guild);
        assert_eq!(config, GuildConfig::default());

        let docs = DocumentStore::open(dir.path()).unwrap();
        let stored = docs.load(CONFIGS_KEY).remove(&guild.to_string()).unwrap();
        let reloaded: GuildConfig = serde_json::from_value(stored).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_default_layout_on_disk() {
        let (dir, store) = open_store();
        store.guilds.get_config(GuildId(1));

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("configs.json")).unwrap())
                .unwrap();
        assert_eq!(
            raw["1"],
            json!({
                "next_ticket_number": 1,
                "show_add_user_button": true,
                "show_remove_user_button": true,
                "max_tickets_per_user": 1,
                "can_members_close": true,
                "inactivity_time": 0,
                "auto_archive_tickets": false,
                "require_close_reason": true,
                "notify_on_open": false,
                "ticket_format": "ticket-{number}",
                "panels": {},
                "tickets": {}
            })
        );
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let (_dir, store) = open_store();
        let guild = GuildId(2);
        let before = store.guilds.get_config(guild);

        let ignored = store
            .guilds
            .update_config(guild, &fields(json!({"foo": "bar"})))
            .unwrap();

        assert_eq!(ignored, vec!["foo".to_string()]);
        assert_eq!(store.guilds.get_config(guild), before);
    }

    #[test]
    fn test_update_on_unknown_guild_creates_it() {
        let (_dir, store) = open_store();
        let guild = GuildId(3);

        store
            .guilds
            .update_config(guild, &fields(json!({"max_tickets_per_user": 3, "can_members_close": false})))
            .unwrap();

        let config = store.guilds.find_config(guild).unwrap();
        assert_eq!(config.max_tickets_per_user, 3);
        assert!(!config.can_members_close);
        assert_eq!(config.next_ticket_number, 1);
    }
}

mod panels {
    use super::*;

    #[test]
    fn test_create_overwrites() {
        let (_dir, store) = open_store();
        let guild = GuildId(1);
        store.panels.create_panel(guild, "support", Panel::default()).unwrap();

        let replacement = Panel {
            title: "Billing".to_string(),
            ..Panel::default()
        };
        store.panels.create_panel(guild, "support", replacement.clone()).unwrap();

        assert_eq!(store.panels.get_panel(guild, "support"), Some(replacement));
        assert_eq!(store.panels.list_panels(guild).len(), 1);
    }

    #[test]
    fn test_update_creates_with_defaults() {
        let (_dir, store) = open_store();
        let guild = GuildId(1);

        store
            .panels
            .update_panel(guild, "new", &fields(json!({"color": "#ff0000", "footer": "hi"})))
            .unwrap();

        let panel = store.panels.get_panel(guild, "new").unwrap();
        assert_eq!(panel.color, "#ff0000");
        assert_eq!(panel.title, Panel::default().title);
        assert_eq!(panel.extra.get("footer"), Some(&json!("hi")));
    }

    #[test]
    fn test_delete_missing_leaves_document_unchanged() {
        let (dir, store) = open_store();
        let guild = GuildId(1);
        store.panels.create_panel(guild, "support", Panel::default()).unwrap();
        let before = std::fs::read(dir.path().join("configs.json")).unwrap();

        assert!(!store.panels.delete_panel(guild, "nope").unwrap());
        assert_eq!(std::fs::read(dir.path().join("configs.json")).unwrap(), before);

        assert!(store.panels.delete_panel(guild, "support").unwrap());
        assert!(!store.panels.list_panels(guild).contains_key("support"));
    }
}

mod tickets {
    use super::*;

    #[test]
    fn test_numbers_start_at_one_and_increment() {
        let (_dir, store) = open_store();
        let guild = GuildId(1);
        let user = discord_fixtures::test_user_id();

        let first = store
            .tickets
            .create_ticket(guild, ChannelId(10), Ticket::opened_by(user, "support"))
            .unwrap();
        let second = store
            .tickets
            .create_ticket(guild, ChannelId(11), Ticket::opened_by(user, "support"))
            .unwrap();

        assert_eq!((first, second), (1, 2));
        assert_eq!(store.guilds.get_config(guild).next_ticket_number, 3);
        assert_eq!(store.tickets.get_ticket(guild, ChannelId(11)).unwrap().ticket_number, 2);
    }

    #[test]
    fn test_numbers_are_per_guild() {
        let (_dir, store) = open_store();
        let user = UserId(1);

        store
            .tickets
            .create_ticket(GuildId(1), ChannelId(10), Ticket::opened_by(user, "a"))
            .unwrap();
        let other = store
            .tickets
            .create_ticket(GuildId(2), ChannelId(20), Ticket::opened_by(user, "a"))
            .unwrap();

        assert_eq!(other, 1);
    }

    #[test]
    fn test_explicit_number_is_kept() {
        let (_dir, store) = open_store();
        let guild = GuildId(1);
        let restored = Ticket {
            ticket_number: 41,
            ..Ticket::default()
        };

        let number = store.tickets.create_ticket(guild, ChannelId(10), restored).unwrap();

        assert_eq!(number, 41);
        assert_eq!(store.guilds.get_config(guild).next_ticket_number, 1);
    }

    #[test]
    fn test_update_missing_ticket_returns_false() {
        let (_dir, store) = open_store();
        let updated = store
            .tickets
            .update_ticket(GuildId(1), ChannelId(10), &fields(json!({"status": "closed"})))
            .unwrap();
        assert!(!updated);
    }

    #[test]
    fn test_update_and_delete() {
        let (_dir, store) = open_store();
        let guild = GuildId(1);
        let channel = discord_fixtures::test_channel_id();
        store
            .tickets
            .create_ticket(guild, channel, Ticket::opened_by(UserId(1), "support"))
            .unwrap();

        let updated = store
            .tickets
            .update_ticket(guild, channel, &fields(json!({"claimed_by": 99, "priority": "high"})))
            .unwrap();
        assert!(updated);
        let ticket = store.tickets.get_ticket(guild, channel).unwrap();
        assert_eq!(ticket.claimed_by, Some(UserId(99)));

        assert!(!store.tickets.delete_ticket(guild, ChannelId(1)).unwrap());
        assert!(store.tickets.delete_ticket(guild, channel).unwrap());
        assert!(store.tickets.list_tickets(guild).is_empty());
    }

    fn status_strategy() -> impl Strategy<Value = TicketStatus> {
        prop_oneof![
            Just(TicketStatus::Open),
            Just(TicketStatus::Closed),
            Just(TicketStatus::Archived),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_open_count_matches_records(
            tickets in prop::collection::btree_map(
                property_testing::channel_id_strategy(),
                (property_testing::user_id_strategy(), status_strategy()),
                0..12,
            ),
            user in property_testing::user_id_strategy(),
        ) {
            let (_dir, store) = open_store();
            let guild = GuildId(1);

            for (channel, (creator, status)) in &tickets {
                let ticket = Ticket {
                    creator_id: Some(*creator),
                    status: *status,
                    ..Ticket::default()
                };
                store.tickets.create_ticket(guild, *channel, ticket).unwrap();
            }

            let expected = tickets
                .values()
                .filter(|(creator, status)| *creator == user && *status == TicketStatus::Open)
                .count();
            prop_assert_eq!(store.tickets.count_open_tickets_for_user(guild, user), expected);
        }
    }
}

mod sessions {
    use super::*;

    #[test]
    fn test_session_survives_reopen() {
        let (dir, store) = open_store();
        let user = UserId(5);
        let guild = GuildId(6);
        store
            .sessions
            .create(user, guild, &EditSession::new("support", Panel::default()))
            .unwrap();

        let reopened = Store::open(dir.path()).unwrap();
        let session = reopened.sessions.get(user, guild).unwrap();
        assert_eq!(session.panel_id.as_deref(), Some("support"));

        let raw: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("edit_sessions.json")).unwrap(),
        )
        .unwrap();
        assert!(raw["5:6"]["panel_data"].is_object());
    }
}
