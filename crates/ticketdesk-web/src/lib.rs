//! # ticketdesk web
//!
//! Admin dashboard for ticketdesk.
//!
//! Admins sign in to edit guild settings and panels stored in the same JSON
//! documents the bot uses, and to manage ticket bans kept in SQLite. The bot
//! consults bans through the public `POST /api/check-banned` endpoint.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod db;
pub mod error;
pub mod pages;
pub mod routes;
pub mod state;

pub use db::AdminDb;
pub use error::{WebError, WebResult};
pub use routes::router;
pub use state::AppState;
