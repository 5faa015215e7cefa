//! User record operations
//!
//! Users are keyed by the identity provider's username. Password hashes
//! exist only for locally provisioned accounts.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use seminar_common::Result;

use super::parse_uuid;
use crate::models::User;

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: parse_uuid(&row.get::<String, _>("id"), "users.id")?,
        username: row.get("username"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
    })
}

/// Load a user by id
pub async fn get_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, username, email, first_name, last_name FROM users WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// Load a user by provider username
pub async fn get_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, username, email, first_name, last_name FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// Upsert a user from an OAuth2 login.
///
/// Creates the record on first login; later logins refresh email and first
/// name from the provider profile.
pub async fn upsert_from_provider(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    first_name: &str,
) -> Result<User> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, first_name, last_name, created_at)
        VALUES (?, ?, ?, ?, '', ?)
        ON CONFLICT(username) DO UPDATE SET
            email = excluded.email,
            first_name = excluded.first_name
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(username)
    .bind(email)
    .bind(first_name)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    get_by_username(pool, username)
        .await?
        .ok_or_else(|| seminar_common::Error::Internal("Upserted user vanished".to_string()))
}

/// Load the stored password hash for a local account (None when the user
/// does not exist or has no local credentials)
pub async fn get_password_hash(pool: &SqlitePool, username: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row.and_then(|r| r.get::<Option<String>, _>("password_hash")))
}

/// Insert a locally provisioned account (tests and bootstrap tooling)
pub async fn create_local(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<User> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, first_name, last_name, password_hash, created_at)
        VALUES (?, ?, '', '', '', ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(User {
        id,
        username: username.to_string(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
    })
}
