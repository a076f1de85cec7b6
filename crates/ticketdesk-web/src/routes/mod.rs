//! HTTP routes of the dashboard.

mod admins;
mod api;
mod bans;
mod guilds;
mod session;

use crate::auth::FlashLevel;
use crate::state::AppState;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use tower_cookies::{CookieManagerLayer, Cookies};
use tower_http::trace::TraceLayer;

/// Builds the dashboard router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(session::index))
        .route("/login", get(session::login_page).post(session::login))
        .route("/logout", get(session::logout))
        .route("/dashboard", get(guilds::dashboard))
        .route("/guilds", get(guilds::list))
        .route("/guilds/:guild_id/config", get(guilds::config))
        .route("/guilds/:guild_id/config/update", post(guilds::update_config))
        .route("/guilds/:guild_id/panels", get(guilds::panels))
        .route("/guilds/:guild_id/panels/:panel_id/edit", get(guilds::edit_panel))
        .route("/guilds/:guild_id/panels/:panel_id/update", post(guilds::update_panel))
        .route("/banned-users", get(bans::list))
        .route("/ban-user", post(bans::ban))
        .route("/unban-user/:ban_id", get(bans::unban))
        .route("/admins", get(admins::list))
        .route("/admins/add", post(admins::add))
        .route("/admins/delete/:admin_id", get(admins::delete))
        .route("/api/check-banned", post(api::check_banned))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Queues a flash message and redirects to `to`.
async fn flash_redirect(
    state: &AppState,
    cookies: &Cookies,
    level: FlashLevel,
    message: impl Into<String>,
    to: &str,
) -> Redirect {
    state.sessions.flash(cookies, level, message).await;
    Redirect::to(to)
}
