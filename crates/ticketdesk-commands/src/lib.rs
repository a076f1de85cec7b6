//! # ticketdesk commands
//!
//! Discord surface of ticketdesk built on the Poise framework.
//!
//! Slash commands cover guild settings, panel management and ticket
//! moderation. Buttons, dropdowns and modals are routed by their custom id
//! through [`interactions::dispatch`], with any multi-step state kept in the
//! edit session store rather than in memory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod ban_check;
pub mod convert;
pub mod custom_id;
pub mod events;
pub mod flow;
pub mod framework;
pub mod interactions;
pub mod modals;
pub mod panel;
pub mod render;
pub mod settings;
pub mod ticket;

pub use framework::*;
