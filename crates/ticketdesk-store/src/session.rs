//! Edit session repository.
//!
//! A panel draft survives between the slash command that starts it and the
//! modals that fill it in, including across a bot restart.

use crate::document::{Document, DocumentStore, EDIT_SESSIONS_KEY};
use crate::model::{EditSession, Panel};
use crate::StoreError;
use ticketdesk_common::{GuildId, UserId};
use tracing::warn;

/// Stores one [`EditSession`] per `(user, guild)` pair.
#[derive(Debug, Clone)]
pub struct EditSessionRepository {
    docs: DocumentStore,
}

fn session_key(user: UserId, guild: GuildId) -> String {
    format!("{user}:{guild}")
}

impl EditSessionRepository {
    /// Creates a repository over a document store.
    pub const fn new(docs: DocumentStore) -> Self {
        Self { docs }
    }

    /// Returns the session of a member in a guild.
    pub fn get(&self, user: UserId, guild: GuildId) -> Option<EditSession> {
        let key = session_key(user, guild);
        let stored = self.docs.load(EDIT_SESSIONS_KEY).remove(&key)?;
        match serde_json::from_value(stored) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored edit session is invalid");
                None
            }
        }
    }

    /// Starts a session, replacing any previous one.
    pub fn create(&self, user: UserId, guild: GuildId, session: &EditSession) -> Result<(), StoreError> {
        let mut sessions = self.docs.load(EDIT_SESSIONS_KEY);
        sessions.insert(session_key(user, guild), serde_json::to_value(session)?);
        self.docs.save(EDIT_SESSIONS_KEY, &sessions)
    }

    /// Replaces the draft of a session, creating the session when absent.
    /// The target panel id of an existing session is kept.
    pub fn update(&self, user: UserId, guild: GuildId, draft: Panel) -> Result<(), StoreError> {
        let session = EditSession {
            panel_data: draft,
            panel_id: self.get(user, guild).and_then(|s| s.panel_id),
        };
        self.create(user, guild, &session)
    }

    /// Ends a session. Returns whether one existed.
    pub fn delete(&self, user: UserId, guild: GuildId) -> Result<bool, StoreError> {
        let mut sessions: Document = self.docs.load(EDIT_SESSIONS_KEY);
        if sessions.remove(&session_key(user, guild)).is_none() {
            return Ok(false);
        }
        self.docs.save(EDIT_SESSIONS_KEY, &sessions)?;
        Ok(true)
    }
}
