//! Common type definitions and newtype wrappers for domain modeling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

snowflake! {
    /// A Discord guild (community) ID.
    GuildId
}

snowflake! {
    /// A Discord channel ID. Tickets are keyed by the channel that hosts them.
    ChannelId
}

snowflake! {
    /// A Discord user ID.
    UserId
}

snowflake! {
    /// A Discord role ID.
    RoleId
}

/// Common result type for the application.
pub type Result<T> = std::result::Result<T, crate::TicketDeskError>;
