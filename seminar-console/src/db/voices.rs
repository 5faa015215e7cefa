//! Voice catalog queries (read-only)

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use seminar_common::Result;

use super::parse_uuid;
use crate::models::Voice;

fn row_to_voice(row: &sqlx::sqlite::SqliteRow) -> Result<Voice> {
    Ok(Voice {
        id: parse_uuid(&row.get::<String, _>("id"), "voices.id")?,
        title: row.get("title"),
        code: row.get("code"),
        description: row.get("description"),
        sample: row.get("sample"),
    })
}

/// List the whole catalog
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Voice>> {
    let rows = sqlx::query("SELECT id, title, code, description, sample FROM voices ORDER BY title")
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_voice).collect()
}

/// Load one catalog entry
pub async fn get_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Voice>> {
    let row = sqlx::query("SELECT id, title, code, description, sample FROM voices WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_voice).transpose()
}

/// Insert a catalog entry (normally the admin service's job; used by tests)
pub async fn create(pool: &SqlitePool, voice: &Voice) -> Result<()> {
    sqlx::query(
        "INSERT INTO voices (id, title, code, description, sample) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(voice.id.to_string())
    .bind(&voice.title)
    .bind(&voice.code)
    .bind(&voice.description)
    .bind(&voice.sample)
    .execute(pool)
    .await?;

    Ok(())
}
