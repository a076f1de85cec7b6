//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use ticketdesk_common::logging::{LogFormat, LoggingConfig};

/// Main configuration structure shared by the bot and the web dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Document store configuration.
    pub storage: StorageConfig,
    /// Admin dashboard configuration.
    pub web: WebConfig,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// Timeout for outbound HTTP calls made by the bot, in seconds.
    pub request_timeout_seconds: u64,
}

/// Where the JSON documents live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `configs.json` and `edit_sessions.json`.
    pub data_dir: String,
}

/// Admin dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WebConfig {
    /// Socket address the dashboard listens on.
    pub bind_address: String,
    /// SQLite connection URL for admins and bans.
    pub database_url: String,
    /// Password given to the seeded `admin` account.
    pub default_admin_password: String,
    /// Ban-check endpoint the bot consults before opening a ticket.
    pub ban_check_url: Option<String>,
}

/// Logging configuration as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level or `EnvFilter` directive.
    pub level: String,
    /// One of `pretty`, `compact` or `json`.
    pub format: String,
    /// Optional log file.
    pub file: Option<String>,
}

impl LoggingSettings {
    /// Converts the file-level settings into the subscriber configuration.
    ///
    /// An unrecognized format falls back to pretty output.
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            format: self.format.parse().unwrap_or(LogFormat::Pretty),
            file_path: self.file.clone(),
            ..LoggingConfig::default()
        }
    }
}
