//! Routing of button, dropdown and modal interactions.

use crate::convert::{guild_key, parse_user_mention, to_user, user_key};
use crate::custom_id::{ComponentAction, ModalAction, PanelEditStep};
use crate::flow::{self, Actor, TicketChannel};
use crate::framework::{user_message, Data, Error};
use crate::modals::{self, ModalInputs};
use crate::render::{draft_preview, panel_problem};
use poise::serenity_prelude as serenity;
use serenity::{
    ComponentInteraction, ComponentInteractionDataKind, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, EditInteractionResponse,
    ModalInteraction,
};
use ticketdesk_common::{GuildId, TicketDeskError, UserId};
use ticketdesk_store::{EditSession, Panel};
use tracing::{debug, error, info, warn};

/// Handles an interaction that is not a slash command.
///
/// Failures are logged and reported to the member ephemerally; they never
/// propagate to the event loop.
pub async fn dispatch(ctx: &serenity::Context, data: &Data, interaction: &serenity::Interaction) {
    match interaction {
        serenity::Interaction::Component(component) => {
            let Some(action) = ComponentAction::parse(&component.data.custom_id) else {
                debug!(custom_id = %component.data.custom_id, "Ignoring unknown component");
                return;
            };
            if let Err(e) = handle_component(ctx, data, component, action).await {
                error!(custom_id = %component.data.custom_id, error = %e, "Component interaction failed");
                report_component_failure(ctx, component, &e).await;
            }
        }
        serenity::Interaction::Modal(modal) => {
            let Some(action) = ModalAction::parse(&modal.data.custom_id) else {
                debug!(custom_id = %modal.data.custom_id, "Ignoring unknown modal");
                return;
            };
            if let Err(e) = handle_modal(ctx, data, modal, action).await {
                error!(custom_id = %modal.data.custom_id, error = %e, "Modal submission failed");
                report_modal_failure(ctx, modal, &e).await;
            }
        }
        _ => {}
    }
}

fn ephemeral(content: impl Into<String>) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

async fn report_component_failure(ctx: &serenity::Context, component: &ComponentInteraction, e: &Error) {
    let text = user_message(e);
    if component.create_response(ctx, ephemeral(text.clone())).await.is_err() {
        let followup = CreateInteractionResponseFollowup::new().content(text).ephemeral(true);
        if let Err(e) = component.create_followup(ctx, followup).await {
            warn!(error = %e, "Failed to report component failure");
        }
    }
}

async fn report_modal_failure(ctx: &serenity::Context, modal: &ModalInteraction, e: &Error) {
    let text = user_message(e);
    if modal.create_response(ctx, ephemeral(text.clone())).await.is_err() {
        let followup = CreateInteractionResponseFollowup::new().content(text).ephemeral(true);
        if let Err(e) = modal.create_followup(ctx, followup).await {
            warn!(error = %e, "Failed to report modal failure");
        }
    }
}

fn session_owner(user: &serenity::User, guild: Option<serenity::GuildId>) -> Result<(UserId, GuildId), Error> {
    let guild = guild.ok_or("guild only")?;
    Ok((user_key(user.id), guild_key(guild)))
}

fn load_session(data: &Data, user: UserId, guild: GuildId) -> Result<EditSession, Error> {
    data.store.sessions.get(user, guild).ok_or_else(|| {
        TicketDeskError::validation("Your panel editor session has expired. Run /panel create again.").into()
    })
}

fn selected_option(panel: &Panel, kind: &ComponentInteractionDataKind) -> Result<String, Error> {
    let ComponentInteractionDataKind::StringSelect { values } = kind else {
        return Err("expected a string select".into());
    };
    values
        .first()
        .and_then(|value| value.parse::<usize>().ok())
        .and_then(|index| panel.dropdown_options.get(index))
        .map(|option| option.label.clone())
        .ok_or_else(|| TicketDeskError::validation("That option is no longer available.").into())
}

async fn handle_component(
    ctx: &serenity::Context,
    data: &Data,
    component: &ComponentInteraction,
    action: ComponentAction,
) -> Result<(), Error> {
    match action {
        ComponentAction::OpenTicket { panel_id } => {
            let guild = component.guild_id.ok_or("guild only")?;
            component.defer_ephemeral(ctx).await?;
            let channel = flow::open_ticket(ctx, data, guild, &component.user, &panel_id, None).await?;
            component
                .edit_response(ctx, EditInteractionResponse::new().content(format!("Your ticket is ready: <#{channel}>")))
                .await?;
        }
        ComponentAction::SelectTicket { panel_id } => {
            let guild = component.guild_id.ok_or("guild only")?;
            let panel = data
                .store
                .panels
                .get_panel(guild_key(guild), &panel_id)
                .ok_or_else(|| TicketDeskError::validation("This panel no longer exists."))?;
            let ticket_type = selected_option(&panel, &component.data.kind)?;
            component.defer_ephemeral(ctx).await?;
            let channel =
                flow::open_ticket(ctx, data, guild, &component.user, &panel_id, Some(ticket_type)).await?;
            component
                .edit_response(ctx, EditInteractionResponse::new().content(format!("Your ticket is ready: <#{channel}>")))
                .await?;
        }
        ComponentAction::CloseTicket => {
            let guild = component.guild_id.ok_or("guild only")?;
            let target = TicketChannel::load(data, guild, component.channel_id)?;
            let actor = Actor::new(&component.user, component.member.as_ref());
            if !flow::can_close(&target.config, target.is_creator(&actor), actor.is_staff(target.support_role())) {
                return Err(TicketDeskError::permission("You are not allowed to close this ticket.").into());
            }
            if target.config.require_close_reason {
                component
                    .create_response(ctx, CreateInteractionResponse::Modal(modals::close_reason_modal()))
                    .await?;
                return Ok(());
            }
            component.defer_ephemeral(ctx).await?;
            let summary = flow::close_ticket(ctx, data, &target, &actor, None).await?;
            if target.config.auto_archive_tickets {
                component
                    .edit_response(ctx, EditInteractionResponse::new().content(summary))
                    .await?;
            }
        }
        ComponentAction::AddUser => prompt_member(ctx, data, component, ModalAction::AddUser).await?,
        ComponentAction::RemoveUser => prompt_member(ctx, data, component, ModalAction::RemoveUser).await?,
        ComponentAction::PanelEdit(step) => {
            let (user, guild) = session_owner(&component.user, component.guild_id)?;
            let session = load_session(data, user, guild)?;
            handle_panel_step(ctx, data, component, step, user, guild, session).await?;
        }
    }
    Ok(())
}

async fn prompt_member(
    ctx: &serenity::Context,
    data: &Data,
    component: &ComponentInteraction,
    action: ModalAction,
) -> Result<(), Error> {
    let guild = component.guild_id.ok_or("guild only")?;
    let target = TicketChannel::load(data, guild, component.channel_id)?;
    target.require_participant(&Actor::new(&component.user, component.member.as_ref()))?;
    component
        .create_response(ctx, CreateInteractionResponse::Modal(modals::member_modal(action)))
        .await?;
    Ok(())
}

async fn handle_panel_step(
    ctx: &serenity::Context,
    data: &Data,
    component: &ComponentInteraction,
    step: PanelEditStep,
    user: UserId,
    guild: GuildId,
    session: EditSession,
) -> Result<(), Error> {
    let response = match step {
        PanelEditStep::Button => CreateInteractionResponse::Modal(modals::panel_button_modal(&session.panel_data)),
        PanelEditStep::Dropdown => {
            CreateInteractionResponse::Modal(modals::panel_dropdown_modal(&session.panel_data))
        }
        PanelEditStep::Save => {
            let panel_id = session
                .panel_id
                .ok_or_else(|| TicketDeskError::validation("This draft has no panel id. Run /panel create again."))?;
            if let Some(problem) = panel_problem(&session.panel_data) {
                return Err(TicketDeskError::validation(problem).into());
            }
            data.store.panels.create_panel(guild, &panel_id, session.panel_data)?;
            data.store.sessions.delete(user, guild)?;
            info!(guild = %guild, panel_id = %panel_id, user = %user, "Panel saved");
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .content(format!("Panel `{panel_id}` saved. Post it with /panel send {panel_id}."))
                    .embeds(Vec::new())
                    .components(Vec::new()),
            )
        }
        PanelEditStep::Cancel => {
            data.store.sessions.delete(user, guild)?;
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .content("Panel editing cancelled.")
                    .embeds(Vec::new())
                    .components(Vec::new()),
            )
        }
    };
    component.create_response(ctx, response).await?;
    Ok(())
}

fn preview_message(panel_id: &str, draft: &Panel) -> CreateInteractionResponseMessage {
    let (embed, controls) = draft_preview(panel_id, draft);
    CreateInteractionResponseMessage::new()
        .content(format!(
            "Editing panel `{panel_id}`. Pick a button or a dropdown, then save."
        ))
        .embeds(vec![embed])
        .components(controls)
        .ephemeral(true)
}

fn update_draft(
    data: &Data,
    user: UserId,
    guild: GuildId,
    apply: impl FnOnce(&mut Panel, &ModalInputs) -> Result<(), String>,
    inputs: &ModalInputs,
) -> Result<(String, Panel), Error> {
    let session = load_session(data, user, guild)?;
    let mut draft = session.panel_data;
    apply(&mut draft, inputs).map_err(TicketDeskError::validation)?;
    data.store.sessions.update(user, guild, draft.clone())?;
    Ok((session.panel_id.unwrap_or_default(), draft))
}

async fn handle_modal(
    ctx: &serenity::Context,
    data: &Data,
    modal: &ModalInteraction,
    action: ModalAction,
) -> Result<(), Error> {
    let inputs = modals::read_inputs(&modal.data.components);

    match action {
        ModalAction::PanelBasics => {
            let (user, guild) = session_owner(&modal.user, modal.guild_id)?;
            let (panel_id, draft) = update_draft(data, user, guild, modals::apply_basics, &inputs)?;
            modal
                .create_response(ctx, CreateInteractionResponse::Message(preview_message(&panel_id, &draft)))
                .await?;
        }
        ModalAction::PanelButton | ModalAction::PanelDropdown => {
            let (user, guild) = session_owner(&modal.user, modal.guild_id)?;
            let apply = if action == ModalAction::PanelButton {
                modals::apply_button
            } else {
                modals::apply_dropdown
            };
            let (panel_id, draft) = update_draft(data, user, guild, apply, &inputs)?;
            modal
                .create_response(ctx, CreateInteractionResponse::UpdateMessage(preview_message(&panel_id, &draft)))
                .await?;
        }
        ModalAction::CloseReason => {
            let guild = modal.guild_id.ok_or("guild only")?;
            let target = TicketChannel::load(data, guild, modal.channel_id)?;
            let actor = Actor::new(&modal.user, modal.member.as_ref());
            let reason = inputs.get("reason").cloned();
            modal.defer_ephemeral(ctx).await?;
            let summary = flow::close_ticket(ctx, data, &target, &actor, reason).await?;
            if target.config.auto_archive_tickets {
                modal
                    .edit_response(ctx, EditInteractionResponse::new().content(summary))
                    .await?;
            }
        }
        ModalAction::AddUser | ModalAction::RemoveUser => {
            let guild = modal.guild_id.ok_or("guild only")?;
            let target = TicketChannel::load(data, guild, modal.channel_id)?;
            let actor = Actor::new(&modal.user, modal.member.as_ref());
            let member = inputs
                .get("user")
                .and_then(|raw| parse_user_mention(raw))
                .and_then(to_user)
                .ok_or_else(|| TicketDeskError::validation("Enter a user id or mention."))?;
            let message = if action == ModalAction::AddUser {
                flow::add_member(ctx, &target, &actor, member).await?
            } else {
                flow::remove_member(ctx, &target, &actor, member).await?
            };
            modal
                .create_response(
                    ctx,
                    CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().content(message)),
                )
                .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketdesk_store::DropdownOption;

    fn dropdown_panel() -> Panel {
        Panel {
            use_button: false,
            dropdown_options: vec![
                DropdownOption {
                    label: "Billing".to_string(),
                    ..DropdownOption::default()
                },
                DropdownOption {
                    label: "Bug".to_string(),
                    ..DropdownOption::default()
                },
            ],
            ..Panel::default()
        }
    }

    #[test]
    fn test_selected_option_by_index() {
        let kind = ComponentInteractionDataKind::StringSelect {
            values: vec!["1".to_string()],
        };
        assert_eq!(selected_option(&dropdown_panel(), &kind).unwrap(), "Bug");
    }

    #[test]
    fn test_selected_option_out_of_range() {
        let kind = ComponentInteractionDataKind::StringSelect {
            values: vec!["7".to_string()],
        };
        let err = selected_option(&dropdown_panel(), &kind).unwrap_err();
        assert_eq!(user_message(&err), "That option is no longer available.");
    }

    #[test]
    fn test_selected_option_requires_string_select() {
        assert!(selected_option(&dropdown_panel(), &ComponentInteractionDataKind::Button).is_err());
    }
}
