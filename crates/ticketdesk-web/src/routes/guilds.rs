use crate::auth::{CurrentAdmin, FlashLevel};
use crate::error::WebResult;
use crate::pages::{
    render, DashboardPage, DashboardStats, EditPanelPage, GuildConfigPage, GuildRow, GuildsPage, PanelRow,
    PanelsPage, StyleOption, BUTTON_STYLES,
};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use serde_json::{json, Value};
use ticketdesk_common::GuildId;
use ticketdesk_store::{Fields, GuildConfig, StoreError, TicketStatus};
use tracing::info;

use super::flash_redirect;

const GUILD_NOT_FOUND: &str = "Server not found";

fn open_tickets(config: &GuildConfig) -> usize {
    config
        .tickets
        .values()
        .filter(|ticket| ticket.status == TicketStatus::Open)
        .count()
}

/// Totals over every stored guild.
pub fn dashboard_stats(configs: &[(GuildId, GuildConfig)]) -> DashboardStats {
    configs
        .iter()
        .fold(DashboardStats::default(), |mut stats, (_, config)| {
            stats.guild_count += 1;
            stats.panel_count += config.panels.len();
            stats.ticket_count += config.tickets.len();
            stats.active_tickets += open_tickets(config);
            stats
        })
}

/// Config of a guild the bot has already stored. Never creates one.
async fn find_guild(state: &AppState, raw: &str) -> WebResult<Option<(GuildId, GuildConfig)>> {
    let Ok(guild) = raw.parse::<GuildId>() else {
        return Ok(None);
    };
    let config = state.with_store(move |store| store.guilds.find_config(guild)).await?;
    Ok(config.map(|config| (guild, config)))
}

pub async fn dashboard(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: tower_cookies::Cookies,
) -> WebResult<Html<String>> {
    let configs = state.with_store(|store| store.guilds.all_configs()).await?;
    render(&DashboardPage {
        username: admin.username,
        flash: state.sessions.take_flash(&cookies).await,
        stats: dashboard_stats(&configs),
    })
}

pub async fn list(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: tower_cookies::Cookies,
) -> WebResult<Html<String>> {
    let guilds = state
        .with_store(|store| store.guilds.all_configs())
        .await?
        .into_iter()
        .map(|(id, config)| GuildRow {
            id: id.to_string(),
            panel_count: config.panels.len(),
            ticket_count: config.tickets.len(),
            open_tickets: open_tickets(&config),
        })
        .collect();
    render(&GuildsPage {
        username: admin.username,
        flash: state.sessions.take_flash(&cookies).await,
        guilds,
    })
}

pub async fn config(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: tower_cookies::Cookies,
    Path(guild_id): Path<String>,
) -> WebResult<Response> {
    let Some((_, config)) = find_guild(&state, &guild_id).await? else {
        return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, GUILD_NOT_FOUND, "/guilds")
            .await
            .into_response());
    };
    let page = GuildConfigPage {
        username: admin.username,
        flash: state.sessions.take_flash(&cookies).await,
        guild_id,
        config,
    };
    Ok(render(&page)?.into_response())
}

/// Settings form. Checkboxes are sent only when ticked.
#[derive(Debug, Default, Deserialize)]
pub struct GuildConfigForm {
    #[serde(default)]
    ticket_format: String,
    max_tickets_per_user: Option<String>,
    inactivity_time: Option<String>,
    show_add_user_button: Option<String>,
    show_remove_user_button: Option<String>,
    can_members_close: Option<String>,
    auto_archive_tickets: Option<String>,
    require_close_reason: Option<String>,
    notify_on_open: Option<String>,
}

fn whole_number(raw: Option<&str>, default: u64, label: &str) -> Result<u64, String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| format!("{label} must be a whole number")),
    }
}

impl GuildConfigForm {
    /// The fields this form sets.
    fn into_fields(self) -> Result<Fields, String> {
        let ticket_format = if self.ticket_format.trim().is_empty() {
            "ticket-{number}".to_string()
        } else {
            self.ticket_format.trim().to_string()
        };
        let max_tickets = whole_number(self.max_tickets_per_user.as_deref(), 1, "Max tickets per member")?;
        let inactivity = whole_number(self.inactivity_time.as_deref(), 0, "Inactivity time")?;

        let fields = json!({
            "ticket_format": ticket_format,
            "max_tickets_per_user": max_tickets,
            "inactivity_time": inactivity,
            "show_add_user_button": self.show_add_user_button.is_some(),
            "show_remove_user_button": self.show_remove_user_button.is_some(),
            "can_members_close": self.can_members_close.is_some(),
            "auto_archive_tickets": self.auto_archive_tickets.is_some(),
            "require_close_reason": self.require_close_reason.is_some(),
            "notify_on_open": self.notify_on_open.is_some(),
        });
        match fields {
            Value::Object(fields) => Ok(fields),
            _ => Ok(Fields::new()),
        }
    }
}

pub async fn update_config(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: tower_cookies::Cookies,
    Path(guild_id): Path<String>,
    Form(form): Form<GuildConfigForm>,
) -> WebResult<Redirect> {
    let Some((guild, _)) = find_guild(&state, &guild_id).await? else {
        return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, GUILD_NOT_FOUND, "/guilds").await);
    };
    let back = format!("/guilds/{guild_id}/config");
    let fields = match form.into_fields() {
        Ok(fields) => fields,
        Err(message) => return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, message, &back).await),
    };

    match state.with_store(move |store| store.guilds.update_config(guild, &fields)).await? {
        Ok(_) => {}
        Err(err @ StoreError::InvalidField { .. }) => {
            return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, err.to_string(), &back).await);
        }
        Err(err) => return Err(err.into()),
    }
    info!(guild = %guild, admin = %admin.username, "Guild settings updated from dashboard");
    Ok(flash_redirect(&state, &cookies, FlashLevel::Success, "Settings updated", &back).await)
}

pub async fn panels(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: tower_cookies::Cookies,
    Path(guild_id): Path<String>,
) -> WebResult<Response> {
    let Some((_, config)) = find_guild(&state, &guild_id).await? else {
        return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, GUILD_NOT_FOUND, "/guilds")
            .await
            .into_response());
    };
    let panels = config
        .panels
        .into_iter()
        .map(|(id, panel)| PanelRow {
            id,
            title: panel.title,
            mode: if panel.use_button { "button" } else { "dropdown" },
        })
        .collect();
    let page = PanelsPage {
        username: admin.username,
        flash: state.sessions.take_flash(&cookies).await,
        guild_id,
        panels,
    };
    Ok(render(&page)?.into_response())
}

pub async fn edit_panel(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: tower_cookies::Cookies,
    Path((guild_id, panel_id)): Path<(String, String)>,
) -> WebResult<Response> {
    let Some((_, config)) = find_guild(&state, &guild_id).await? else {
        return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, GUILD_NOT_FOUND, "/guilds")
            .await
            .into_response());
    };
    let Some(panel) = config.panels.get(&panel_id).cloned() else {
        let back = format!("/guilds/{guild_id}/panels");
        return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, "Panel not found", &back)
            .await
            .into_response());
    };

    let styles = BUTTON_STYLES
        .iter()
        .map(|&name| StyleOption {
            name,
            selected: panel.button_style.eq_ignore_ascii_case(name),
        })
        .collect();
    let page = EditPanelPage {
        username: admin.username,
        flash: state.sessions.take_flash(&cookies).await,
        guild_id,
        panel_id,
        title: panel.title,
        description: panel.description,
        color: panel.color,
        styles,
        button_text: panel.button_text,
        button_emoji: panel.button_emoji.unwrap_or_default(),
    };
    Ok(render(&page)?.into_response())
}

/// Panel form. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct PanelForm {
    title: Option<String>,
    description: Option<String>,
    color: Option<String>,
    button_style: Option<String>,
    button_text: Option<String>,
    button_emoji: Option<String>,
}

impl PanelForm {
    fn into_fields(self) -> Result<Fields, String> {
        let mut fields = Fields::new();
        if let Some(style) = &self.button_style {
            if !BUTTON_STYLES.iter().any(|known| known.eq_ignore_ascii_case(style)) {
                return Err(format!("Unknown button style '{style}'"));
            }
        }
        let texts = [
            ("title", self.title),
            ("description", self.description),
            ("color", self.color),
            ("button_style", self.button_style.map(|s| s.to_ascii_lowercase())),
            ("button_text", self.button_text),
        ];
        for (key, value) in texts {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::String(value.trim().to_string()));
            }
        }
        if let Some(emoji) = self.button_emoji {
            let emoji = emoji.trim();
            let value = if emoji.is_empty() {
                Value::Null
            } else {
                Value::String(emoji.to_string())
            };
            fields.insert("button_emoji".to_string(), value);
        }
        Ok(fields)
    }
}

pub async fn update_panel(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    cookies: tower_cookies::Cookies,
    Path((guild_id, panel_id)): Path<(String, String)>,
    Form(form): Form<PanelForm>,
) -> WebResult<Redirect> {
    let Some((guild, config)) = find_guild(&state, &guild_id).await? else {
        return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, GUILD_NOT_FOUND, "/guilds").await);
    };
    if !config.panels.contains_key(&panel_id) {
        let back = format!("/guilds/{guild_id}/panels");
        return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, "Panel not found", &back).await);
    }

    let back = format!("/guilds/{guild_id}/panels/{panel_id}/edit");
    let fields = match form.into_fields() {
        Ok(fields) => fields,
        Err(message) => return Ok(flash_redirect(&state, &cookies, FlashLevel::Danger, message, &back).await),
    };
    let panel = panel_id.clone();
    state
        .with_store(move |store| store.panels.update_panel(guild, &panel, &fields))
        .await??;
    info!(guild = %guild, panel_id = %panel_id, admin = %admin.username, "Panel updated from dashboard");
    Ok(flash_redirect(&state, &cookies, FlashLevel::Success, "Panel updated", &back).await)
}
