//! Seminar queries
//!
//! Seminars are strictly owner-scoped: there are no system seminars, so
//! every query filters on owner_id.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use seminar_common::pagination::Page;
use seminar_common::Result;

use super::{parse_json, parse_timestamp, parse_uuid, to_json};
use crate::models::Seminar;

fn row_to_seminar(row: &sqlx::sqlite::SqliteRow) -> Result<Seminar> {
    let speaker: Option<String> = row.get("speaker_id");
    Ok(Seminar {
        id: parse_uuid(&row.get::<String, _>("id"), "seminars.id")?,
        title: row.get("title"),
        description: row.get("description"),
        date: parse_timestamp(&row.get::<String, _>("date"), "seminars.date")?,
        owner: parse_uuid(&row.get::<String, _>("owner_id"), "seminars.owner_id")?,
        state: row.get("state"),
        speaker: speaker
            .as_deref()
            .map(|s| parse_uuid(s, "seminars.speaker_id"))
            .transpose()?,
        cover: row.get("cover"),
        status: parse_json(&row.get::<String, _>("status"), "seminars.status")?,
        resources: parse_json(&row.get::<String, _>("resources"), "seminars.resources")?,
    })
}

const SEMINAR_COLUMNS: &str =
    "id, title, description, date, owner_id, state, speaker_id, cover, status, resources";

/// List filter for [`list_owned`]
#[derive(Debug, Default)]
pub struct SeminarFilter {
    /// Restrict to these states; empty means no state filter
    pub states: Vec<String>,
    /// Case-insensitive title substring
    pub name: Option<String>,
}

/// Count and list `user`'s seminars, newest first, paginated
pub async fn list_owned(
    pool: &SqlitePool,
    user: Uuid,
    filter: &SeminarFilter,
    page: &Page,
) -> Result<(i64, Vec<Seminar>)> {
    let mut where_clause = String::from("owner_id = ?");
    if !filter.states.is_empty() {
        let placeholders = vec!["?"; filter.states.len()].join(", ");
        where_clause.push_str(&format!(" AND state IN ({})", placeholders));
    }
    if filter.name.is_some() {
        where_clause.push_str(" AND title LIKE ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM seminars WHERE {}", where_clause);
    let mut count_query = sqlx::query_scalar(&count_sql).bind(user.to_string());
    for state in &filter.states {
        count_query = count_query.bind(state.clone());
    }
    if let Some(name) = &filter.name {
        count_query = count_query.bind(format!("%{}%", name));
    }
    let count: i64 = count_query.fetch_one(pool).await?;

    let list_sql = format!(
        "SELECT {} FROM seminars WHERE {} ORDER BY date DESC LIMIT ? OFFSET ?",
        SEMINAR_COLUMNS, where_clause
    );
    let mut list_query = sqlx::query(&list_sql).bind(user.to_string());
    for state in &filter.states {
        list_query = list_query.bind(state.clone());
    }
    if let Some(name) = &filter.name {
        list_query = list_query.bind(format!("%{}%", name));
    }
    let rows = list_query
        .bind(page.size)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;

    Ok((
        count,
        rows.iter().map(row_to_seminar).collect::<Result<_>>()?,
    ))
}

/// Load a seminar only if `user` owns it
pub async fn get_owned(pool: &SqlitePool, id: Uuid, user: Uuid) -> Result<Option<Seminar>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM seminars WHERE id = ? AND owner_id = ?",
        SEMINAR_COLUMNS
    ))
    .bind(id.to_string())
    .bind(user.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_seminar).transpose()
}

/// Insert a seminar
pub async fn create(pool: &SqlitePool, seminar: &Seminar) -> Result<()> {
    sqlx::query(&format!(
        "INSERT INTO seminars ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        SEMINAR_COLUMNS
    ))
    .bind(seminar.id.to_string())
    .bind(&seminar.title)
    .bind(&seminar.description)
    .bind(seminar.date.to_rfc3339())
    .bind(seminar.owner.to_string())
    .bind(&seminar.state)
    .bind(seminar.speaker.map(|id| id.to_string()))
    .bind(&seminar.cover)
    .bind(to_json(&seminar.status)?)
    .bind(to_json(&seminar.resources)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist the whole record in one save
pub async fn update(pool: &SqlitePool, seminar: &Seminar) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE seminars
        SET title = ?, description = ?, state = ?, speaker_id = ?,
            cover = ?, status = ?, resources = ?
        WHERE id = ?
        "#,
    )
    .bind(&seminar.title)
    .bind(&seminar.description)
    .bind(&seminar.state)
    .bind(seminar.speaker.map(|id| id.to_string()))
    .bind(&seminar.cover)
    .bind(to_json(&seminar.status)?)
    .bind(to_json(&seminar.resources)?)
    .bind(seminar.id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a seminar owned by `user`; false when no such row
pub async fn delete_owned(pool: &SqlitePool, id: Uuid, user: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM seminars WHERE id = ? AND owner_id = ?")
        .bind(id.to_string())
        .bind(user.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
