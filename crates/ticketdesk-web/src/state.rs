//! Shared handler state.

use crate::auth::SessionStore;
use crate::db::AdminDb;
use crate::error::{WebError, WebResult};
use ticketdesk_store::Store;

/// Everything a dashboard handler can reach.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Admins and bans.
    pub db: AdminDb,
    /// Guild settings, panels and tickets shared with the bot.
    pub store: Store,
    /// Signed-in admins and pending flash messages.
    pub sessions: SessionStore,
}

impl AppState {
    /// Builds state with no active sessions.
    pub fn new(db: AdminDb, store: Store) -> Self {
        Self {
            db,
            store,
            sessions: SessionStore::default(),
        }
    }

    /// Runs a store call on the blocking pool. The store reads and renames
    /// files synchronously.
    pub async fn with_store<T, F>(&self, call: F) -> WebResult<T>
    where
        F: FnOnce(&Store) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || call(&store))
            .await
            .map_err(|e| WebError::Task(e.to_string()))
    }
}
