//! Client for the dashboard's ban lookup endpoint.

use serde::{Deserialize, Serialize};
use ticketdesk_common::{GuildId, UserId};
use tracing::debug;

/// Request body of `POST /api/check-banned`.
#[derive(Debug, Clone, Serialize)]
struct BanQuery {
    user_id: String,
    guild_id: String,
}

/// Answer of the ban lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BanStatus {
    /// Whether the member is banned from opening tickets.
    pub banned: bool,
    /// Reason recorded by the admin.
    #[serde(default)]
    pub reason: Option<String>,
    /// When the ban was issued.
    #[serde(default)]
    pub banned_at: Option<String>,
}

/// Asks the dashboard whether a member may open tickets.
#[derive(Debug, Clone)]
pub struct BanChecker {
    client: reqwest::Client,
    url: Option<String>,
}

impl BanChecker {
    /// Creates a checker. Without a URL every member is allowed.
    pub const fn new(client: reqwest::Client, url: Option<String>) -> Self {
        Self { client, url }
    }

    /// Whether lookups are configured.
    pub const fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Looks up a member.
    pub async fn check(&self, guild: GuildId, user: UserId) -> Result<BanStatus, reqwest::Error> {
        let Some(url) = self.url.as_deref() else {
            return Ok(BanStatus::default());
        };

        let query = BanQuery {
            user_id: user.to_string(),
            guild_id: guild.to_string(),
        };
        let status: BanStatus = self
            .client
            .post(url)
            .json(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(guild = %guild, user = %user, banned = status.banned, "Ban lookup finished");
        Ok(status)
    }
}
