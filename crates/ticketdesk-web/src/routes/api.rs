use crate::error::WebResult;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

/// Reads an id that may be sent as a string or a number. Blank and zero ids
/// count as missing.
fn id_field(body: &Value, key: &str) -> Option<String> {
    let id = match body.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!id.is_empty() && id != "0").then_some(id)
}

pub async fn check_banned(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> WebResult<Response> {
    let body = payload.map(|Json(body)| body).unwrap_or(Value::Null);
    let (Some(user_id), Some(guild_id)) = (id_field(&body, "user_id"), id_field(&body, "guild_id")) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing parameters" })),
        )
            .into_response());
    };

    let ban = state.db.find_ban(&user_id, &guild_id).await?;
    debug!(user_id = %user_id, guild_id = %guild_id, banned = ban.is_some(), "Ban check");
    let body = match ban {
        Some(ban) => json!({
            "banned": true,
            "reason": ban.reason,
            "banned_at": ban.banned_at.to_rfc3339(),
        }),
        None => json!({ "banned": false }),
    };
    Ok(Json(body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_field_accepts_strings_and_numbers() {
        let body = json!({ "user_id": "12", "guild_id": 34, "blank": " " });
        assert_eq!(id_field(&body, "user_id").as_deref(), Some("12"));
        assert_eq!(id_field(&body, "guild_id").as_deref(), Some("34"));
        assert_eq!(id_field(&body, "blank"), None);
        assert_eq!(id_field(&body, "missing"), None);
    }

    #[test]
    fn test_zero_ids_count_as_missing() {
        let body = json!({ "user_id": 0, "guild_id": "0", "ok": 7 });
        assert_eq!(id_field(&body, "user_id"), None);
        assert_eq!(id_field(&body, "guild_id"), None);
        assert_eq!(id_field(&body, "ok").as_deref(), Some("7"));
    }
}
