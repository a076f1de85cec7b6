//! Default values for every configuration section.

use crate::schema::{DiscordConfig, LoggingSettings, StorageConfig, WebConfig};

/// Default data directory for the JSON documents.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default dashboard bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

/// Default SQLite URL for the dashboard.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:admin_panel.db?mode=rwc";

/// Password for the seeded admin account when none is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            request_timeout_seconds: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            default_admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            ban_check_url: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}
