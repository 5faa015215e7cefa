//! Session persistence
//!
//! One row per live session, keyed by the cookie token. OAuth2 sessions
//! store the provider access token and its absolute expiry.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use seminar_common::Result;

use super::{parse_timestamp, parse_uuid};
use crate::models::Session;

fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> Result<Session> {
    let token_expires_at: Option<String> = row.get("token_expires_at");
    Ok(Session {
        token: parse_uuid(&row.get::<String, _>("token"), "sessions.token")?,
        user_id: parse_uuid(&row.get::<String, _>("user_id"), "sessions.user_id")?,
        access_token: row.get("access_token"),
        token_expires_at: token_expires_at
            .as_deref()
            .map(|s| parse_timestamp(s, "sessions.token_expires_at"))
            .transpose()?,
        created_at: parse_timestamp(&row.get::<String, _>("created_at"), "sessions.created_at")?,
    })
}

/// Create a session; returns the cookie token
pub async fn create(
    pool: &SqlitePool,
    user_id: Uuid,
    access_token: Option<&str>,
    token_expires_at: Option<DateTime<Utc>>,
) -> Result<Uuid> {
    let token = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO sessions (token, user_id, access_token, token_expires_at, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(token.to_string())
    .bind(user_id.to_string())
    .bind(access_token)
    .bind(token_expires_at.map(|dt| dt.to_rfc3339()))
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(token)
}

/// Load a session by cookie token
pub async fn get(pool: &SqlitePool, token: Uuid) -> Result<Option<Session>> {
    let row = sqlx::query(
        r#"
        SELECT token, user_id, access_token, token_expires_at, created_at
        FROM sessions WHERE token = ?
        "#,
    )
    .bind(token.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_session).transpose()
}

/// Delete a session (logout)
pub async fn delete(pool: &SqlitePool, token: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token.to_string())
        .execute(pool)
        .await?;

    Ok(())
}
