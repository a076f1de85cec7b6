//! Page templates.

use crate::auth::Flash;
use crate::error::WebResult;
use askama::Template;
use axum::response::Html;
use ticketdesk_store::GuildConfig;

/// Button styles the bot knows how to render.
pub const BUTTON_STYLES: &[&str] = &["blurple", "grey", "green", "red"];

/// Renders a template into an HTML response.
pub fn render(page: &impl Template) -> WebResult<Html<String>> {
    Ok(Html(page.render()?))
}

/// `GET /login`.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    /// Always empty: nobody is signed in yet.
    pub username: String,
    /// Pending message.
    pub flash: Option<Flash>,
}

/// Counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Guilds with a stored config.
    pub guild_count: usize,
    /// Panels across all guilds.
    pub panel_count: usize,
    /// Ticket records across all guilds.
    pub ticket_count: usize,
    /// Tickets whose status is `open`.
    pub active_tickets: usize,
}

/// `GET /dashboard`.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    /// Signed-in admin.
    pub username: String,
    /// Pending message.
    pub flash: Option<Flash>,
    /// Counters.
    pub stats: DashboardStats,
}

/// One row of the guild list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRow {
    /// Guild id.
    pub id: String,
    /// Number of panels.
    pub panel_count: usize,
    /// Number of ticket records.
    pub ticket_count: usize,
    /// Number of open tickets.
    pub open_tickets: usize,
}

/// `GET /guilds`.
#[derive(Template)]
#[template(path = "guilds.html")]
pub struct GuildsPage {
    /// Signed-in admin.
    pub username: String,
    /// Pending message.
    pub flash: Option<Flash>,
    /// Known guilds.
    pub guilds: Vec<GuildRow>,
}

/// `GET /guilds/:guild_id/config`.
#[derive(Template)]
#[template(path = "guild_config.html")]
pub struct GuildConfigPage {
    /// Signed-in admin.
    pub username: String,
    /// Pending message.
    pub flash: Option<Flash>,
    /// Guild id.
    pub guild_id: String,
    /// Current settings.
    pub config: GuildConfig,
}

/// One row of a guild's panel list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    /// Panel id.
    pub id: String,
    /// Embed title.
    pub title: String,
    /// `button` or `dropdown`.
    pub mode: &'static str,
}

/// `GET /guilds/:guild_id/panels`.
#[derive(Template)]
#[template(path = "panels.html")]
pub struct PanelsPage {
    /// Signed-in admin.
    pub username: String,
    /// Pending message.
    pub flash: Option<Flash>,
    /// Guild id.
    pub guild_id: String,
    /// The guild's panels.
    pub panels: Vec<PanelRow>,
}

/// A button style choice in the panel form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOption {
    /// Style name.
    pub name: &'static str,
    /// Whether the panel uses it.
    pub selected: bool,
}

/// `GET /guilds/:guild_id/panels/:panel_id/edit`.
#[derive(Template)]
#[template(path = "edit_panel.html")]
pub struct EditPanelPage {
    /// Signed-in admin.
    pub username: String,
    /// Pending message.
    pub flash: Option<Flash>,
    /// Guild id.
    pub guild_id: String,
    /// Panel id.
    pub panel_id: String,
    /// Embed title.
    pub title: String,
    /// Embed description.
    pub description: String,
    /// Embed color.
    pub color: String,
    /// Style choices with the current one selected.
    pub styles: Vec<StyleOption>,
    /// Button label.
    pub button_text: String,
    /// Button emoji, empty when unset.
    pub button_emoji: String,
}

/// One row of the ban list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRow {
    /// Ban id.
    pub id: i64,
    /// Banned user.
    pub user_id: String,
    /// Guild of the ban.
    pub guild_id: String,
    /// Reason, empty when none was given.
    pub reason: String,
    /// Formatted ban time.
    pub banned_at: String,
}

/// `GET /banned-users`.
#[derive(Template)]
#[template(path = "banned_users.html")]
pub struct BansPage {
    /// Signed-in admin.
    pub username: String,
    /// Pending message.
    pub flash: Option<Flash>,
    /// Bans, newest first.
    pub bans: Vec<BanRow>,
}

/// One row of the admin list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRow {
    /// Admin id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Super admin flag.
    pub is_super_admin: bool,
    /// Formatted creation time.
    pub created_at: String,
}

/// `GET /admins`.
#[derive(Template)]
#[template(path = "admins.html")]
pub struct AdminsPage {
    /// Signed-in admin.
    pub username: String,
    /// Pending message.
    pub flash: Option<Flash>,
    /// Id of the signed-in admin, who cannot delete themselves.
    pub current_id: i64,
    /// All admins.
    pub admins: Vec<AdminRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FlashLevel;

    #[test]
    fn test_login_page_shows_flash_without_nav() {
        let page = LoginPage {
            username: String::new(),
            flash: Some(Flash {
                level: FlashLevel::Danger,
                message: "Invalid username or password".to_string(),
            }),
        };
        let html = page.render().unwrap();
        assert!(html.contains("flash danger"));
        assert!(html.contains("Invalid username or password"));
        assert!(!html.contains("/logout"));
    }

    #[test]
    fn test_guild_config_checkboxes_follow_flags() {
        let mut config = GuildConfig::default();
        config.notify_on_open = true;
        config.can_members_close = false;
        let html = GuildConfigPage {
            username: "admin".to_string(),
            flash: None,
            guild_id: "42".to_string(),
            config,
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"name="notify_on_open" checked"#));
        assert!(!html.contains(r#"name="can_members_close" checked"#));
        assert!(html.contains("/guilds/42/config/update"));
    }
}
