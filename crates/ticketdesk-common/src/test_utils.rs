//! Test utilities and shared test helpers for ticketdesk.
//!
//! Common fixtures used by the unit and integration tests of every crate in
//! the workspace.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Discord-related test utilities.
pub mod discord_fixtures {
    use crate::{ChannelId, GuildId, UserId};

    /// Create a test guild ID.
    pub fn test_guild_id() -> GuildId {
        GuildId(111111111111111111)
    }

    /// Create a test channel ID.
    pub fn test_channel_id() -> ChannelId {
        ChannelId(123456789012345678)
    }

    /// Create a test user ID.
    pub fn test_user_id() -> UserId {
        UserId(987654321098765432)
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// A minimal valid configuration as YAML string.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
discord:
  token: "test_token"
"#
    }

    /// A full configuration as YAML string.
    pub fn full_config_yaml() -> &'static str {
        concat!(
            "discord:\n",
            "  token: \"test_token_full\"\n",
            "  request_timeout_seconds: 15\n",
            "\n",
            "storage:\n",
            "  data_dir: \"/var/lib/ticketdesk\"\n",
            "\n",
            "web:\n",
            "  bind_address: \"127.0.0.1:8080\"\n",
            "  database_url: \"sqlite:/var/lib/ticketdesk/admin.db\"\n",
            "  default_admin_password: \"change-me\"\n",
            "  ban_check_url: \"http://127.0.0.1:8080/api/check-banned\"\n",
            "\n",
            "logging:\n",
            "  level: \"debug\"\n",
            "  format: \"json\"\n",
            "  file: \"logs/ticketdesk.log\"\n"
        )
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use crate::{ChannelId, UserId};
    use proptest::prelude::*;

    /// Strategy for generating valid Discord channel IDs.
    pub fn channel_id_strategy() -> impl Strategy<Value = ChannelId> {
        (100000000000000000u64..=999999999999999999u64).prop_map(ChannelId)
    }

    /// Strategy for generating a small pool of user IDs so collisions are likely.
    pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
        (1u64..=5u64).prop_map(UserId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_fixture_ids_are_nonzero() {
        assert_ne!(discord_fixtures::test_guild_id().0, 0);
        assert_ne!(discord_fixtures::test_channel_id().0, 0);
        assert_ne!(discord_fixtures::test_user_id().0, 0);
    }
}
