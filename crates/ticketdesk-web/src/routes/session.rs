use crate::auth::{verify_password, CurrentAdmin, FlashLevel};
use crate::error::WebResult;
use crate::pages::{render, LoginPage};
use crate::state::AppState;
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::{info, warn};

use super::flash_redirect;

pub async fn index(admin: Option<CurrentAdmin>) -> Redirect {
    if admin.is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

pub async fn login_page(State(state): State<AppState>, cookies: Cookies) -> WebResult<Html<String>> {
    render(&LoginPage {
        username: String::new(),
        flash: state.sessions.take_flash(&cookies).await,
    })
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> WebResult<Redirect> {
    let admin = state.db.find_admin_by_username(form.username.trim()).await?;
    match admin {
        Some(admin) if verify_password(&form.password, &admin.password_hash) => {
            info!(admin = %admin.username, "Admin signed in");
            state
                .sessions
                .sign_in(
                    &cookies,
                    CurrentAdmin {
                        admin_id: admin.id,
                        username: admin.username,
                        is_super_admin: admin.is_super_admin,
                    },
                )
                .await;
            Ok(Redirect::to("/dashboard"))
        }
        _ => {
            warn!(username = %form.username, "Failed sign-in attempt");
            Ok(flash_redirect(
                &state,
                &cookies,
                FlashLevel::Danger,
                "Invalid username or password",
                "/login",
            )
            .await)
        }
    }
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    state.sessions.sign_out(&cookies).await;
    Redirect::to("/login")
}
