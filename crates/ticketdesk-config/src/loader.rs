//! Configuration loading with environment variable overrides.

use crate::Config;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "TICKETDESK_CONFIG";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// Name of the offending variable.
        var: String,
        /// Underlying parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl From<ConfigError> for ticketdesk_common::TicketDeskError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse(&content)?;
        Self::apply_env_overrides(&mut config)?;
        debug!(path = %path.as_ref().display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from the usual locations.
    ///
    /// `explicit` (typically a `--config` argument) wins, then
    /// `TICKETDESK_CONFIG`, then `config.yaml`/`config.yml` in the working
    /// directory. Without any file the defaults are used. Environment
    /// overrides are applied in every case.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_config(path);
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::load_config(&config_path)
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")
        } else {
            info!("No configuration file found, using defaults with environment overrides");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            Ok(config)
        }
    }

    /// Parse a YAML document. Missing sections and fields take their defaults.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |name| env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_BOT_TOKEN") {
            config.discord.token = token;
        }

        if let Some(timeout) = lookup("DISCORD_TIMEOUT") {
            config.discord.request_timeout_seconds =
                timeout.trim().parse().map_err(|e| ConfigError::EnvParse {
                    var: "DISCORD_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(dir) = lookup("TICKETDESK_DATA_DIR") {
            config.storage.data_dir = dir;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            config.web.database_url = url;
        }

        if let Some(address) = lookup("WEB_BIND_ADDRESS") {
            config.web.bind_address = address;
        }

        if let Some(url) = lookup("BAN_CHECK_URL") {
            config.web.ban_check_url = Some(url).filter(|u| !u.trim().is_empty());
        }

        if let Some(password) = lookup("DEFAULT_ADMIN_PASSWORD") {
            config.web.default_admin_password = password;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}
