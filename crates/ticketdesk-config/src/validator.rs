//! Startup validation for each binary.

use crate::{Config, ConfigError};

impl Config {
    /// Checks what the chat agent cannot start without.
    pub fn validate_for_bot(&self) -> Result<(), ConfigError> {
        if self.discord.token.trim().is_empty() {
            return Err(ConfigError::Missing(
                "discord.token (or DISCORD_BOT_TOKEN)".to_string(),
            ));
        }
        self.validate_storage()
    }

    /// Checks what the admin dashboard cannot start without.
    pub fn validate_for_web(&self) -> Result<(), ConfigError> {
        if self.web.database_url.trim().is_empty() {
            return Err(ConfigError::Missing(
                "web.database_url (or DATABASE_URL)".to_string(),
            ));
        }
        if self.web.bind_address.trim().is_empty() {
            return Err(ConfigError::Missing(
                "web.bind_address (or WEB_BIND_ADDRESS)".to_string(),
            ));
        }
        self.validate_storage()
    }

    fn validate_storage(&self) -> Result<(), ConfigError> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::Missing("storage.data_dir".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_rejected() {
        let config = Config::default();
        let err = config.validate_for_bot().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
        assert!(err.to_string().contains("discord.token"));
    }

    #[test]
    fn test_web_does_not_need_token() {
        let config = Config::default();
        assert!(config.validate_for_web().is_ok());
    }

    #[test]
    fn test_token_present_passes() {
        let mut config = Config::default();
        config.discord.token = "abc".to_string();
        assert!(config.validate_for_bot().is_ok());
    }
}
