//! # ticketdesk bot
//!
//! Discord agent for ticketdesk.
//!
//! Wires the Poise framework from `ticketdesk-commands` to a serenity client,
//! runs the startup ticket reconciliation and owns the process lifecycle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod directory;
pub mod error;

pub use bot::*;
pub use directory::*;
pub use error::*;
