//! Speaker queries
//!
//! Same visibility discipline as avatars: system speakers for everyone,
//! user speakers only for their owner.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use seminar_common::pagination::Page;
use seminar_common::Result;

use super::{parse_json, parse_uuid, to_json};
use crate::models::{ResourceType, Speaker};

fn row_to_speaker(row: &sqlx::sqlite::SqliteRow) -> Result<Speaker> {
    let kind: String = row.get("type");
    let avatar: Option<String> = row.get("avatar_id");
    let voice: Option<String> = row.get("voice_id");
    Ok(Speaker {
        id: parse_uuid(&row.get::<String, _>("id"), "speakers.id")?,
        name: row.get("name"),
        description: row.get("description"),
        avatar: avatar
            .as_deref()
            .map(|s| parse_uuid(s, "speakers.avatar_id"))
            .transpose()?,
        voice: voice
            .as_deref()
            .map(|s| parse_uuid(s, "speakers.voice_id"))
            .transpose()?,
        owner: parse_uuid(&row.get::<String, _>("owner_id"), "speakers.owner_id")?,
        kind: ResourceType::parse(&kind).ok_or_else(|| {
            seminar_common::Error::Internal(format!("Bad resource type: {}", kind))
        })?,
        motions: parse_json(&row.get::<String, _>("motions"), "speakers.motions")?,
        covers: parse_json(&row.get::<String, _>("covers"), "speakers.covers")?,
    })
}

const SPEAKER_COLUMNS: &str =
    "id, name, description, avatar_id, voice_id, owner_id, type, motions, covers";

/// Count and list speakers visible to `user` (system + own), paginated
pub async fn list_visible(
    pool: &SqlitePool,
    user: Uuid,
    page: &Page,
) -> Result<(i64, Vec<Speaker>)> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM speakers WHERE type = 'system' OR owner_id = ?")
            .bind(user.to_string())
            .fetch_one(pool)
            .await?;

    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM speakers
        WHERE type = 'system' OR owner_id = ?
        ORDER BY name
        LIMIT ? OFFSET ?
        "#,
        SPEAKER_COLUMNS
    ))
    .bind(user.to_string())
    .bind(page.size)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok((
        count,
        rows.iter().map(row_to_speaker).collect::<Result<_>>()?,
    ))
}

/// Load a speaker if it is visible to `user`
pub async fn get_visible(pool: &SqlitePool, id: Uuid, user: Uuid) -> Result<Option<Speaker>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM speakers WHERE id = ? AND (type = 'system' OR owner_id = ?)",
        SPEAKER_COLUMNS
    ))
    .bind(id.to_string())
    .bind(user.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_speaker).transpose()
}

/// Load a speaker only if `user` owns it
pub async fn get_owned(pool: &SqlitePool, id: Uuid, user: Uuid) -> Result<Option<Speaker>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM speakers WHERE id = ? AND owner_id = ?",
        SPEAKER_COLUMNS
    ))
    .bind(id.to_string())
    .bind(user.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_speaker).transpose()
}

/// Insert a speaker
pub async fn create(pool: &SqlitePool, speaker: &Speaker) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO speakers (id, name, description, avatar_id, voice_id, owner_id, type, motions, covers)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(speaker.id.to_string())
    .bind(&speaker.name)
    .bind(&speaker.description)
    .bind(speaker.avatar.map(|id| id.to_string()))
    .bind(speaker.voice.map(|id| id.to_string()))
    .bind(speaker.owner.to_string())
    .bind(speaker.kind.as_str())
    .bind(to_json(&speaker.motions)?)
    .bind(to_json(&speaker.covers)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist mutable speaker fields
pub async fn update(pool: &SqlitePool, speaker: &Speaker) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE speakers SET name = ?, description = ?, motions = ?, covers = ?
        WHERE id = ?
        "#,
    )
    .bind(&speaker.name)
    .bind(&speaker.description)
    .bind(to_json(&speaker.motions)?)
    .bind(to_json(&speaker.covers)?)
    .bind(speaker.id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a user-type speaker owned by `user`; false when no such row
pub async fn delete_user_owned(pool: &SqlitePool, id: Uuid, user: Uuid) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM speakers WHERE id = ? AND owner_id = ? AND type = 'user'")
            .bind(id.to_string())
            .bind(user.to_string())
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}
