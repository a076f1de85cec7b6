//! Integration tests for the ticketdesk-bot crate.
//!
//! Startup checks that do not need a Discord connection.

use ticketdesk_bot::{BotError, TicketDeskBot};
use ticketdesk_config::{Config, ConfigLoader};
use ticketdesk_store::Store;

#[cfg(feature = "testing")]
use ticketdesk_common::test_utils::{config_fixtures, init_test_logging};

#[test]
fn test_missing_token_is_a_startup_error() {
    #[cfg(feature = "testing")]
    init_test_logging();

    let config = ConfigLoader::parse("storage:\n  data_dir: data\n").unwrap();
    let err: BotError = config.validate_for_bot().unwrap_err().into();
    assert!(err.to_string().contains("discord.token"));
}

#[cfg(feature = "testing")]
#[test]
fn test_full_fixture_is_ready_for_the_bot() {
    let config = ConfigLoader::parse(config_fixtures::full_config_yaml()).unwrap();
    assert!(config.validate_for_bot().is_ok());
    assert_eq!(config.discord.request_timeout_seconds, 15);
}

#[test]
fn test_bot_builds_over_an_opened_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    assert!(dir.path().join("configs.json").exists());
    assert!(dir.path().join("edit_sessions.json").exists());

    let mut config = Config::default();
    config.discord.token = "token".to_string();
    let _bot = TicketDeskBot::new(config, store);
    assert_eq!(TicketDeskBot::intents(), poise::serenity_prelude::GatewayIntents::GUILDS);
}
