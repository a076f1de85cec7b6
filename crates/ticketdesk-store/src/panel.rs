//! Panel repository. Panels live inside their guild's config record.

use crate::guild::GuildConfigRepository;
use crate::model::{Fields, Panel};
use crate::StoreError;
use std::collections::BTreeMap;
use ticketdesk_common::GuildId;
use tracing::debug;

/// CRUD over the panels of a guild.
#[derive(Debug, Clone)]
pub struct PanelRepository {
    guilds: GuildConfigRepository,
}

impl PanelRepository {
    /// Creates a repository on top of the guild config repository.
    pub const fn new(guilds: GuildConfigRepository) -> Self {
        Self { guilds }
    }

    /// Returns one panel.
    pub fn get_panel(&self, guild: GuildId, panel_id: &str) -> Option<Panel> {
        self.guilds.get_config(guild).panels.remove(panel_id)
    }

    /// Returns every panel of a guild keyed by panel id.
    pub fn list_panels(&self, guild: GuildId) -> BTreeMap<String, Panel> {
        self.guilds.get_config(guild).panels
    }

    /// Stores a panel, replacing any panel with the same id.
    pub fn create_panel(&self, guild: GuildId, panel_id: &str, panel: Panel) -> Result<(), StoreError> {
        self.guilds.modify(guild, |config| {
            config.panels.insert(panel_id.to_string(), panel);
            Ok(((), true))
        })?;
        debug!(guild = %guild, panel_id, "Saved panel");
        Ok(())
    }

    /// Merges fields into a panel, creating it with defaults when absent.
    pub fn update_panel(&self, guild: GuildId, panel_id: &str, fields: &Fields) -> Result<(), StoreError> {
        self.guilds.modify(guild, |config| {
            config
                .panels
                .entry(panel_id.to_string())
                .or_default()
                .apply_update(fields)?;
            Ok(((), true))
        })
    }

    /// Removes a panel. Returns whether it existed.
    pub fn delete_panel(&self, guild: GuildId, panel_id: &str) -> Result<bool, StoreError> {
        self.guilds.modify(guild, |config| {
            let removed = config.panels.remove(panel_id).is_some();
            Ok((removed, removed))
        })
    }
}
