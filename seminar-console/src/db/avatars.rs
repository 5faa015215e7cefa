//! Avatar queries
//!
//! Visibility is applied in the WHERE clause: system avatars for everyone,
//! user avatars only for their owner.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use seminar_common::pagination::Page;
use seminar_common::Result;

use super::{parse_json, parse_uuid, to_json};
use crate::models::{Avatar, AvatarAction, ResourceType};

fn row_to_avatar(row: &sqlx::sqlite::SqliteRow) -> Result<Avatar> {
    let kind: String = row.get("type");
    Ok(Avatar {
        id: parse_uuid(&row.get::<String, _>("id"), "avatars.id")?,
        name: row.get("name"),
        portrait: row.get("portrait"),
        description: row.get("description"),
        kind: ResourceType::parse(&kind).ok_or_else(|| {
            seminar_common::Error::Internal(format!("Bad resource type: {}", kind))
        })?,
        owner: parse_uuid(&row.get::<String, _>("owner_id"), "avatars.owner_id")?,
        motions: parse_json(&row.get::<String, _>("motions"), "avatars.motions")?,
    })
}

/// Count and list avatars visible to `user` (system + own), paginated
pub async fn list_visible(
    pool: &SqlitePool,
    user: Uuid,
    page: &Page,
) -> Result<(i64, Vec<Avatar>)> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM avatars WHERE type = 'system' OR owner_id = ?")
            .bind(user.to_string())
            .fetch_one(pool)
            .await?;

    let rows = sqlx::query(
        r#"
        SELECT id, name, portrait, description, type, owner_id, motions
        FROM avatars
        WHERE type = 'system' OR owner_id = ?
        ORDER BY name
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user.to_string())
    .bind(page.size)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok((count, rows.iter().map(row_to_avatar).collect::<Result<_>>()?))
}

/// Load an avatar if it is visible to `user`
pub async fn get_visible(pool: &SqlitePool, id: Uuid, user: Uuid) -> Result<Option<Avatar>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, portrait, description, type, owner_id, motions
        FROM avatars
        WHERE id = ? AND (type = 'system' OR owner_id = ?)
        "#,
    )
    .bind(id.to_string())
    .bind(user.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_avatar).transpose()
}

/// Load an avatar only if `user` owns it
pub async fn get_owned(pool: &SqlitePool, id: Uuid, user: Uuid) -> Result<Option<Avatar>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, portrait, description, type, owner_id, motions
        FROM avatars
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(id.to_string())
    .bind(user.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_avatar).transpose()
}

/// Insert an avatar
pub async fn create(pool: &SqlitePool, avatar: &Avatar) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO avatars (id, name, portrait, description, type, owner_id, motions)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(avatar.id.to_string())
    .bind(&avatar.name)
    .bind(&avatar.portrait)
    .bind(&avatar.description)
    .bind(avatar.kind.as_str())
    .bind(avatar.owner.to_string())
    .bind(to_json(&avatar.motions)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist mutable avatar fields
pub async fn update(pool: &SqlitePool, avatar: &Avatar) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE avatars SET name = ?, description = ?, motions = ?
        WHERE id = ?
        "#,
    )
    .bind(&avatar.name)
    .bind(&avatar.description)
    .bind(to_json(&avatar.motions)?)
    .bind(avatar.id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a user-type avatar owned by `user`; false when no such row
pub async fn delete_user_owned(pool: &SqlitePool, id: Uuid, user: Uuid) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM avatars WHERE id = ? AND owner_id = ? AND type = 'user'")
            .bind(id.to_string())
            .bind(user.to_string())
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Motion clips attached to an avatar
pub async fn list_actions(pool: &SqlitePool, avatar_id: Uuid) -> Result<Vec<AvatarAction>> {
    let rows = sqlx::query(
        "SELECT id, type, description, avatar_id FROM avatar_actions WHERE avatar_id = ?",
    )
    .bind(avatar_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(AvatarAction {
                id: parse_uuid(&row.get::<String, _>("id"), "avatar_actions.id")?,
                kind: row.get("type"),
                description: row.get("description"),
                avatar: parse_uuid(
                    &row.get::<String, _>("avatar_id"),
                    "avatar_actions.avatar_id",
                )?,
            })
        })
        .collect()
}
