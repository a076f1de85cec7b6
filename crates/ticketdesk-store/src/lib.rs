//! # ticketdesk store
//!
//! Persistence for ticketdesk: a JSON document store and the repositories
//! layered on top of it.
//!
//! Every guild has one [`GuildConfig`] record in the `configs` document,
//! with its panels and tickets embedded. Panel drafts that span several
//! Discord interactions live in the `edit_sessions` document.
//!
//! Each repository operation is one load-modify-save cycle against a whole
//! document, with no locking. Two writers racing on the same document end
//! with the last save winning.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod error;
pub mod guild;
pub mod model;
pub mod panel;
pub mod reconcile;
pub mod session;
pub mod ticket;

pub use document::DocumentStore;
pub use error::StoreError;
pub use guild::GuildConfigRepository;
pub use model::*;
pub use panel::PanelRepository;
pub use reconcile::{reconcile_tickets, ChannelDirectory};
pub use session::EditSessionRepository;
pub use ticket::TicketRepository;

use std::path::PathBuf;

/// All repositories over one data directory.
#[derive(Debug, Clone)]
pub struct Store {
    /// Guild configuration records.
    pub guilds: GuildConfigRepository,
    /// Ticket panels.
    pub panels: PanelRepository,
    /// Ticket records.
    pub tickets: TicketRepository,
    /// Panel edit sessions.
    pub sessions: EditSessionRepository,
}

impl Store {
    /// Opens the data directory, seeding empty documents when they are absent.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let docs = DocumentStore::open(dir)?;
        docs.init()?;
        Ok(Self::from_documents(docs))
    }

    /// Builds the repositories over an already opened document store.
    pub fn from_documents(docs: DocumentStore) -> Self {
        let guilds = GuildConfigRepository::new(docs.clone());
        Self {
            panels: PanelRepository::new(guilds.clone()),
            tickets: TicketRepository::new(guilds.clone()),
            sessions: EditSessionRepository::new(docs),
            guilds,
        }
    }
}
