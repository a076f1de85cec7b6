use crate::auth::{CurrentAdmin, FlashLevel};
use crate::error::{WebError, WebResult};
use crate::pages::{render, BanRow, BansPage};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use ticketdesk_common::format_timestamp;
use tower_cookies::Cookies;
use tracing::info;

use super::flash_redirect;

pub async fn list(admin: CurrentAdmin, State(state): State<AppState>, cookies: Cookies) -> WebResult<Html<String>> {
    let bans = state
        .db
        .list_bans()
        .await?
        .into_iter()
        .map(|ban| BanRow {
            id: ban.id,
            user_id: ban.user_id,
            guild_id: ban.guild_id,
            reason: ban.reason.unwrap_or_default(),
            banned_at: format_timestamp(ban.banned_at),
        })
        .collect();
    render(&BansPage {
        username: admin.username,
        flash: state.sessions.take_flash(&cookies).await,
        bans,
    })
}

#[derive(Debug, Deserialize)]
pub struct BanForm {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    guild_id: String,
    reason: Option<String>,
}

pub async fn ban(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<BanForm>,
) -> WebResult<Redirect> {
    let user_id = form.user_id.trim();
    let guild_id = form.guild_id.trim();
    if user_id.is_empty() || guild_id.is_empty() {
        return Ok(flash_redirect(
            &state,
            &cookies,
            FlashLevel::Danger,
            "User id and server id are required",
            "/banned-users",
        )
        .await);
    }
    let reason = form.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());

    match state.db.create_ban(user_id, guild_id, reason, Some(admin.admin_id)).await {
        Ok(_) => {
            info!(user_id, guild_id, admin = %admin.username, "Member banned from tickets");
            Ok(flash_redirect(&state, &cookies, FlashLevel::Success, "User banned", "/banned-users").await)
        }
        Err(WebError::Conflict(message)) => {
            Ok(flash_redirect(&state, &cookies, FlashLevel::Warning, message, "/banned-users").await)
        }
        Err(e) => Err(e),
    }
}

pub async fn unban(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: Cookies,
    Path(ban_id): Path<i64>,
) -> WebResult<Redirect> {
    if state.db.delete_ban(ban_id).await? {
        info!(ban_id, admin = %admin.username, "Ban lifted");
        Ok(flash_redirect(&state, &cookies, FlashLevel::Success, "Ban removed", "/banned-users").await)
    } else {
        Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, "Ban not found", "/banned-users").await)
    }
}
