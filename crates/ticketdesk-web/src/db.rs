//! SQLite storage for dashboard admins and ticket bans.

use crate::error::{WebError, WebResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Dashboard account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Admin {
    /// Row id.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Argon2 PHC string.
    #[serde(skip)]
    pub password_hash: String,
    /// Super admins manage other admins.
    pub is_super_admin: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A member barred from opening tickets in one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct BannedUser {
    /// Row id.
    pub id: i64,
    /// Discord user id.
    pub user_id: String,
    /// Discord guild id.
    pub guild_id: String,
    /// Reason given by the admin.
    pub reason: Option<String>,
    /// When the ban was issued.
    pub banned_at: DateTime<Utc>,
    /// Admin who issued the ban.
    pub banned_by: Option<i64>,
}

/// Connection pool over the admin database.
#[derive(Debug, Clone)]
pub struct AdminDb {
    pool: SqlitePool,
}

impl AdminDb {
    /// Connects to `database_url` and creates the tables when missing.
    pub async fn connect(database_url: &str) -> WebResult<Self> {
        info!(database_url, "Connecting to admin database");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let db = Self { pool };
        db.initialize_schema().await?;
        Ok(db)
    }

    /// Private in-memory database. A single connection is kept alive for
    /// the lifetime of the pool so the data survives between queries.
    pub async fn in_memory() -> WebResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let db = Self { pool };
        db.initialize_schema().await?;
        Ok(db)
    }

    async fn initialize_schema(&self) -> WebResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS admin (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                is_super_admin BOOLEAN NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS banned_user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                guild_id TEXT NOT NULL,
                reason TEXT,
                banned_at TIMESTAMP NOT NULL,
                banned_by INTEGER REFERENCES admin(id) ON DELETE SET NULL,
                UNIQUE (user_id, guild_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        debug!("Admin database schema ready");
        Ok(())
    }

    /// Looks up an admin by login name.
    pub async fn find_admin_by_username(&self, username: &str) -> WebResult<Option<Admin>> {
        Ok(sqlx::query_as::<_, Admin>("SELECT * FROM admin WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Looks up an admin by id.
    pub async fn find_admin(&self, id: i64) -> WebResult<Option<Admin>> {
        Ok(sqlx::query_as::<_, Admin>("SELECT * FROM admin WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Every admin, oldest first.
    pub async fn list_admins(&self) -> WebResult<Vec<Admin>> {
        Ok(sqlx::query_as::<_, Admin>("SELECT * FROM admin ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    /// Number of admin accounts.
    pub async fn count_admins(&self) -> WebResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM admin")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Whether at least one super admin exists.
    pub async fn has_super_admin(&self) -> WebResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin WHERE is_super_admin = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Adds an admin. Fails with `Conflict` when the username is taken.
    pub async fn create_admin(
        &self,
        username: &str,
        password_hash: &str,
        is_super_admin: bool,
    ) -> WebResult<i64> {
        if self.find_admin_by_username(username).await?.is_some() {
            return Err(WebError::Conflict("Username already exists".to_string()));
        }
        let result = sqlx::query(
            "INSERT INTO admin (username, password_hash, is_super_admin, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(is_super_admin)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| unique_conflict(e, "Username already exists"))?;
        Ok(result.last_insert_rowid())
    }

    /// Deletes an admin. Returns whether a row was removed.
    pub async fn delete_admin(&self, id: i64) -> WebResult<bool> {
        let result = sqlx::query("DELETE FROM admin WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every ban, newest first.
    pub async fn list_bans(&self) -> WebResult<Vec<BannedUser>> {
        Ok(
            sqlx::query_as::<_, BannedUser>("SELECT * FROM banned_user ORDER BY banned_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// The ban of `user_id` in `guild_id`, if any.
    pub async fn find_ban(&self, user_id: &str, guild_id: &str) -> WebResult<Option<BannedUser>> {
        Ok(sqlx::query_as::<_, BannedUser>(
            "SELECT * FROM banned_user WHERE user_id = ? AND guild_id = ?",
        )
        .bind(user_id)
        .bind(guild_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Bans a member in a guild. Fails with `Conflict` when already banned there.
    pub async fn create_ban(
        &self,
        user_id: &str,
        guild_id: &str,
        reason: Option<&str>,
        banned_by: Option<i64>,
    ) -> WebResult<i64> {
        if self.find_ban(user_id, guild_id).await?.is_some() {
            return Err(WebError::Conflict(
                "User is already banned in this server".to_string(),
            ));
        }
        let result = sqlx::query(
            "INSERT INTO banned_user (user_id, guild_id, reason, banned_at, banned_by) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(guild_id)
        .bind(reason)
        .bind(Utc::now())
        .bind(banned_by)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_conflict(e, "User is already banned in this server"))?;
        Ok(result.last_insert_rowid())
    }

    /// Lifts a ban. Returns whether a row was removed.
    pub async fn delete_ban(&self, id: i64) -> WebResult<bool> {
        let result = sqlx::query("DELETE FROM banned_user WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn unique_conflict(err: sqlx::Error, message: &str) -> WebError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => WebError::Conflict(message.to_string()),
        _ => WebError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_admin_lifecycle() {
        let db = AdminDb::in_memory().await.unwrap();
        assert!(!db.has_super_admin().await.unwrap());

        let id = db.create_admin("root", "hash", true).await.unwrap();
        assert!(db.has_super_admin().await.unwrap());
        assert_eq!(db.find_admin(id).await.unwrap().unwrap().username, "root");

        let dup = db.create_admin("root", "other", false).await.unwrap_err();
        assert!(matches!(dup, WebError::Conflict(_)));

        assert!(db.delete_admin(id).await.unwrap());
        assert!(!db.delete_admin(id).await.unwrap());
        assert_eq!(db.count_admins().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ban_is_unique_per_guild() {
        let db = AdminDb::in_memory().await.unwrap();
        db.create_ban("1", "10", Some("spam"), None).await.unwrap();
        db.create_ban("1", "20", None, None).await.unwrap();
        let dup = db.create_ban("1", "10", None, None).await.unwrap_err();
        assert!(matches!(dup, WebError::Conflict(_)));

        let ban = db.find_ban("1", "10").await.unwrap().unwrap();
        assert_eq!(ban.reason.as_deref(), Some("spam"));
        assert_eq!(db.list_bans().await.unwrap().len(), 2);

        assert!(db.delete_ban(ban.id).await.unwrap());
        assert!(db.find_ban("1", "10").await.unwrap().is_none());
    }
}
