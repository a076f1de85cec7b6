//! # ticketdesk config
//!
//! Application configuration for the ticketdesk bot and admin dashboard.
//!
//! Configuration is read from a YAML file, overridden by environment
//! variables, and checked by the validator for whichever binary is starting.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::*;
pub use schema::*;
pub use validator::*;
