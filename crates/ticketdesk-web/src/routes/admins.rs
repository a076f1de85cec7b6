use crate::auth::{hash_password, CurrentAdmin, FlashLevel};
use crate::error::{WebError, WebResult};
use crate::pages::{render, AdminRow, AdminsPage};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use ticketdesk_common::format_timestamp;
use tower_cookies::Cookies;
use tracing::{info, warn};

use super::flash_redirect;

const ACCESS_DENIED: &str = "Access denied";

/// Sends non-super admins back to the dashboard.
async fn deny(state: &AppState, cookies: &Cookies, admin: &CurrentAdmin) -> Redirect {
    warn!(admin = %admin.username, "Admin management attempted without super admin rights");
    flash_redirect(state, cookies, FlashLevel::Danger, ACCESS_DENIED, "/dashboard").await
}

pub async fn list(admin: CurrentAdmin, State(state): State<AppState>, cookies: Cookies) -> WebResult<Response> {
    if !admin.is_super_admin {
        return Ok(deny(&state, &cookies, &admin).await.into_response());
    }
    let admins = state
        .db
        .list_admins()
        .await?
        .into_iter()
        .map(|row| AdminRow {
            id: row.id,
            username: row.username,
            is_super_admin: row.is_super_admin,
            created_at: format_timestamp(row.created_at),
        })
        .collect();
    let page = AdminsPage {
        username: admin.username,
        flash: state.sessions.take_flash(&cookies).await,
        current_id: admin.admin_id,
        admins,
    };
    Ok(render(&page)?.into_response())
}

#[derive(Debug, Deserialize)]
pub struct AdminForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    is_super_admin: Option<String>,
}

pub async fn add(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<AdminForm>,
) -> WebResult<Redirect> {
    if !admin.is_super_admin {
        return Ok(deny(&state, &cookies, &admin).await);
    }
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Ok(flash_redirect(
            &state,
            &cookies,
            FlashLevel::Danger,
            "Username and password are required",
            "/admins",
        )
        .await);
    }

    let hash = hash_password(&form.password)?;
    let is_super_admin = form.is_super_admin.as_deref() == Some("on");
    match state.db.create_admin(username, &hash, is_super_admin).await {
        Ok(id) => {
            info!(id, username, by = %admin.username, "Admin added");
            Ok(flash_redirect(&state, &cookies, FlashLevel::Success, "Admin added", "/admins").await)
        }
        Err(WebError::Conflict(message)) => {
            Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, message, "/admins").await)
        }
        Err(e) => Err(e),
    }
}

pub async fn delete(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: Cookies,
    Path(admin_id): Path<i64>,
) -> WebResult<Redirect> {
    if !admin.is_super_admin {
        return Ok(deny(&state, &cookies, &admin).await);
    }
    if admin_id == admin.admin_id {
        return Ok(flash_redirect(
            &state,
            &cookies,
            FlashLevel::Danger,
            "You cannot delete your own account",
            "/admins",
        )
        .await);
    }
    if state.db.delete_admin(admin_id).await? {
        let revoked = state.sessions.revoke_admin(admin_id).await;
        info!(admin_id, revoked, by = %admin.username, "Admin deleted");
        Ok(flash_redirect(&state, &cookies, FlashLevel::Success, "Admin deleted", "/admins").await)
    } else {
        Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, "Admin not found", "/admins").await)
    }
}
