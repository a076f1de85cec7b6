//! Password hashing, cookie sessions and flash messages.

use crate::db::AdminDb;
use crate::error::{WebError, WebResult};
use crate::state::AppState;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_cookies::{Cookie, Cookies};
use tracing::warn;
use uuid::Uuid;

/// Cookie holding the session id.
pub const SESSION_COOKIE: &str = "ticketdesk_session";

/// Cookie pointing at a pending flash message.
pub const FLASH_COOKIE: &str = "flash";

/// Hashes a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> WebResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| WebError::Hash(e.to_string()))
}

/// Checks a password against a stored PHC string. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Login name of the account seeded on first start.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Creates the `admin` super admin when no super admin exists yet.
/// Returns whether an account was created.
pub async fn ensure_super_admin(db: &AdminDb, password: &str) -> WebResult<bool> {
    if db.has_super_admin().await? {
        return Ok(false);
    }
    let hash = hash_password(password)?;
    db.create_admin(DEFAULT_ADMIN_USERNAME, &hash, true).await?;
    warn!(
        username = DEFAULT_ADMIN_USERNAME,
        "Created default super admin; change its password after signing in"
    );
    Ok(true)
}

/// The admin behind a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAdmin {
    /// Row id of the admin.
    pub admin_id: i64,
    /// Login name.
    pub username: String,
    /// Whether the admin may manage other admins.
    pub is_super_admin: bool,
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    /// The action worked.
    Success,
    /// Nothing changed, but nothing failed either.
    Warning,
    /// The action was refused.
    Danger,
}

impl FlashLevel {
    /// CSS-style class name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// A one-shot message shown on the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    /// Severity.
    pub level: FlashLevel,
    /// Text shown to the admin.
    pub message: String,
}

/// In-memory sessions and pending flash messages, keyed by random cookie values.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, CurrentAdmin>>>,
    flashes: Arc<RwLock<HashMap<String, Flash>>>,
}

impl SessionStore {
    /// Starts a session and sets its cookie.
    pub async fn sign_in(&self, cookies: &Cookies, admin: CurrentAdmin) {
        let id = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone(), admin);
        cookies.add(
            Cookie::build((SESSION_COOKIE, id))
                .path("/")
                .http_only(true)
                .build(),
        );
    }

    /// Ends the session carried by `cookies`, if any.
    pub async fn sign_out(&self, cookies: &Cookies) {
        if let Some(cookie) = cookies.get(SESSION_COOKIE) {
            self.sessions.write().await.remove(cookie.value());
        }
        cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    }

    /// The admin signed in with `cookies`.
    pub async fn current(&self, cookies: &Cookies) -> Option<CurrentAdmin> {
        let cookie = cookies.get(SESSION_COOKIE)?;
        self.sessions.read().await.get(cookie.value()).cloned()
    }

    /// Ends every session of a deleted admin. Returns how many were dropped.
    pub async fn revoke_admin(&self, admin_id: i64) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, admin| admin.admin_id != admin_id);
        before - sessions.len()
    }

    /// Queues a message for the next page this browser loads.
    pub async fn flash(&self, cookies: &Cookies, level: FlashLevel, message: impl Into<String>) {
        let id = Uuid::new_v4().to_string();
        self.flashes.write().await.insert(
            id.clone(),
            Flash {
                level,
                message: message.into(),
            },
        );
        cookies.add(Cookie::build((FLASH_COOKIE, id)).path("/").http_only(true).build());
    }

    /// Removes and returns the pending message, if any.
    pub async fn take_flash(&self, cookies: &Cookies) -> Option<Flash> {
        let cookie = cookies.get(FLASH_COOKIE)?;
        cookies.remove(Cookie::build((FLASH_COOKIE, "")).path("/").build());
        self.flashes.write().await.remove(cookie.value())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;
        state
            .sessions
            .current(&cookies)
            .await
            .ok_or_else(|| Redirect::to("/login"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("anything", "pbkdf2:sha256:legacy"));
    }

    fn signed_in(admin_id: i64) -> CurrentAdmin {
        CurrentAdmin {
            admin_id,
            username: format!("admin{admin_id}"),
            is_super_admin: false,
        }
    }

    #[tokio::test]
    async fn test_revoke_admin_ends_only_their_sessions() {
        let store = SessionStore::default();
        {
            let mut sessions = store.sessions.write().await;
            sessions.insert("laptop".to_string(), signed_in(1));
            sessions.insert("phone".to_string(), signed_in(1));
            sessions.insert("desk".to_string(), signed_in(2));
        }

        assert_eq!(store.revoke_admin(1).await, 2);
        assert_eq!(store.revoke_admin(1).await, 0);
        let sessions = store.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key("desk"));
    }

    #[tokio::test]
    async fn test_default_admin_seeded_once() {
        let db = AdminDb::in_memory().await.unwrap();
        assert!(ensure_super_admin(&db, "first").await.unwrap());
        assert!(!ensure_super_admin(&db, "second").await.unwrap());

        let admin = db.find_admin_by_username("admin").await.unwrap().unwrap();
        assert!(admin.is_super_admin);
        assert!(verify_password("first", &admin.password_hash));
        assert_eq!(db.count_admins().await.unwrap(), 1);
    }
}
