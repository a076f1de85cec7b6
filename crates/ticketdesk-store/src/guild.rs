//! Guild configuration repository.

use crate::document::{DocumentStore, CONFIGS_KEY};
use crate::model::{Fields, GuildConfig};
use crate::StoreError;
use serde_json::Value;
use ticketdesk_common::GuildId;
use tracing::{debug, error, info, warn};

/// Reads and writes [`GuildConfig`] records in the `configs` document.
#[derive(Debug, Clone)]
pub struct GuildConfigRepository {
    docs: DocumentStore,
}

impl GuildConfigRepository {
    /// Creates a repository over a document store.
    pub const fn new(docs: DocumentStore) -> Self {
        Self { docs }
    }

    /// Returns the configuration of a guild, creating and saving the defaults
    /// on first access.
    ///
    /// This always yields a usable record. When the stored entry cannot be
    /// decoded the defaults are returned and the entry is left on disk as is.
    pub fn get_config(&self, guild: GuildId) -> GuildConfig {
        let mut configs = self.docs.load(CONFIGS_KEY);
        let key = guild.to_string();

        if let Some(stored) = configs.get(&key) {
            return decode(guild, stored.clone()).unwrap_or_default();
        }

        let config = GuildConfig::default();
        match serde_json::to_value(&config) {
            Ok(value) => {
                configs.insert(key, value);
                if let Err(e) = self.docs.save(CONFIGS_KEY, &configs) {
                    error!(guild = %guild, error = %e, "Failed to persist default guild config");
                } else {
                    info!(guild = %guild, "Created default guild config");
                }
            }
            Err(e) => error!(guild = %guild, error = %e, "Failed to encode default guild config"),
        }
        config
    }

    /// Same as [`get_config`](Self::get_config); called when the bot joins a guild.
    pub fn initialize(&self, guild: GuildId) -> GuildConfig {
        self.get_config(guild)
    }

    /// Returns a guild's configuration without creating it.
    pub fn find_config(&self, guild: GuildId) -> Option<GuildConfig> {
        let configs = self.docs.load(CONFIGS_KEY);
        configs
            .get(&guild.to_string())
            .and_then(|stored| decode(guild, stored.clone()))
    }

    /// Every stored configuration that decodes, keyed by guild.
    pub fn all_configs(&self) -> Vec<(GuildId, GuildConfig)> {
        self.docs
            .load(CONFIGS_KEY)
            .into_iter()
            .filter_map(|(key, stored)| {
                let guild = match key.parse::<GuildId>() {
                    Ok(guild) => guild,
                    Err(_) => {
                        warn!(key = %key, "Skipping config entry with a non-numeric guild id");
                        return None;
                    }
                };
                decode(guild, stored).map(|config| (guild, config))
            })
            .collect()
    }

    /// Merges recognized fields into a guild's configuration.
    ///
    /// Returns the keys that were ignored because the record has no such field.
    pub fn update_config(&self, guild: GuildId, fields: &Fields) -> Result<Vec<String>, StoreError> {
        let ignored = self.modify(guild, |config| {
            let ignored = config.apply_update(fields)?;
            Ok((ignored, true))
        })?;
        if !ignored.is_empty() {
            debug!(guild = %guild, ?ignored, "Ignored unknown config keys");
        }
        Ok(ignored)
    }

    /// Runs one load-modify-save cycle on a guild's record.
    ///
    /// The closure returns its result and whether it changed the record. The
    /// document is written when the record changed or did not exist before.
    pub(crate) fn modify<R, F>(&self, guild: GuildId, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut GuildConfig) -> Result<(R, bool), StoreError>,
    {
        let mut configs = self.docs.load(CONFIGS_KEY);
        let key = guild.to_string();

        let (mut config, created) = match configs.get(&key) {
            Some(stored) => (serde_json::from_value(stored.clone())?, false),
            None => (GuildConfig::default(), true),
        };

        let (result, changed) = f(&mut config)?;
        if changed || created {
            configs.insert(key, serde_json::to_value(&config)?);
            self.docs.save(CONFIGS_KEY, &configs)?;
        }
        Ok(result)
    }
}

fn decode(guild: GuildId, stored: Value) -> Option<GuildConfig> {
    match serde_json::from_value(stored) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(guild = %guild, error = %e, "Stored guild config is invalid");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo() -> (tempfile::TempDir, GuildConfigRepository) {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::open(dir.path()).unwrap();
        (dir, GuildConfigRepository::new(docs))
    }

    #[test]
    fn test_find_does_not_create() {
        let (_dir, repo) = repo();
        assert!(repo.find_config(GuildId(1)).is_none());
        assert!(repo.all_configs().is_empty());
    }

    #[test]
    fn test_corrupt_entry_is_not_overwritten_by_reads() {
        let (_dir, repo) = repo();
        let mut document = serde_json::Map::new();
        document.insert("7".to_string(), json!({"next_ticket_number": "seven"}));
        repo.docs.save(CONFIGS_KEY, &document).unwrap();

        assert_eq!(repo.get_config(GuildId(7)), GuildConfig::default());
        assert_eq!(repo.docs.load(CONFIGS_KEY), document);
    }

    #[test]
    fn test_corrupt_entry_rejects_writes() {
        let (_dir, repo) = repo();
        let mut document = serde_json::Map::new();
        document.insert("7".to_string(), json!({"tickets": 3}));
        repo.docs.save(CONFIGS_KEY, &document).unwrap();

        let fields = json!({"notify_on_open": true});
        let result = repo.update_config(GuildId(7), fields.as_object().unwrap());
        assert!(matches!(result, Err(StoreError::Serialization(_))));
        assert_eq!(repo.docs.load(CONFIGS_KEY), document);
    }

    #[test]
    fn test_all_configs_skips_bad_keys() {
        let (_dir, repo) = repo();
        repo.get_config(GuildId(10));
        let mut document = repo.docs.load(CONFIGS_KEY);
        document.insert("not-a-guild".to_string(), json!({}));
        repo.docs.save(CONFIGS_KEY, &document).unwrap();

        let all = repo.all_configs();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, GuildId(10));
    }
}
