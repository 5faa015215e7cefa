//! TTS order persistence (console-owned table)

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use seminar_common::pagination::Page;
use seminar_common::Result;

use super::{parse_json, parse_timestamp, parse_uuid, to_json};
use crate::models::{TtsOrder, TtsOrderState};

fn row_to_order(row: &sqlx::sqlite::SqliteRow) -> Result<TtsOrder> {
    let state: String = row.get("state");
    Ok(TtsOrder {
        id: parse_uuid(&row.get::<String, _>("id"), "tts_orders.id")?,
        text: row.get("text"),
        spk_id: row.get("spk_id"),
        state: TtsOrderState::parse(&state).ok_or_else(|| {
            seminar_common::Error::Internal(format!("Bad tts order state: {}", state))
        })?,
        status: parse_json(&row.get::<String, _>("status"), "tts_orders.status")?,
        output_file: row.get("output_file"),
        owner: parse_uuid(&row.get::<String, _>("owner_id"), "tts_orders.owner_id")?,
        created_at: parse_timestamp(
            &row.get::<String, _>("created_at"),
            "tts_orders.created_at",
        )?,
        updated_at: parse_timestamp(
            &row.get::<String, _>("updated_at"),
            "tts_orders.updated_at",
        )?,
    })
}

const ORDER_COLUMNS: &str =
    "id, text, spk_id, state, status, output_file, owner_id, created_at, updated_at";

/// Insert a new order
pub async fn create(pool: &SqlitePool, order: &TtsOrder) -> Result<()> {
    sqlx::query(&format!(
        "INSERT INTO tts_orders ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        ORDER_COLUMNS
    ))
    .bind(order.id.to_string())
    .bind(&order.text)
    .bind(&order.spk_id)
    .bind(order.state.as_str())
    .bind(to_json(&order.status)?)
    .bind(&order.output_file)
    .bind(order.owner.to_string())
    .bind(order.created_at.to_rfc3339())
    .bind(order.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Count and list `user`'s orders, newest first, paginated
pub async fn list_owned(
    pool: &SqlitePool,
    user: Uuid,
    page: &Page,
) -> Result<(i64, Vec<TtsOrder>)> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tts_orders WHERE owner_id = ?")
        .bind(user.to_string())
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query(&format!(
        "SELECT {} FROM tts_orders WHERE owner_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
        ORDER_COLUMNS
    ))
    .bind(user.to_string())
    .bind(page.size)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok((count, rows.iter().map(row_to_order).collect::<Result<_>>()?))
}

/// Load an order only if `user` owns it
pub async fn get_owned(pool: &SqlitePool, id: Uuid, user: Uuid) -> Result<Option<TtsOrder>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM tts_orders WHERE id = ? AND owner_id = ?",
        ORDER_COLUMNS
    ))
    .bind(id.to_string())
    .bind(user.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_order).transpose()
}

/// Load an order by id (worker callback path, no owner scoping)
pub async fn get_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<TtsOrder>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM tts_orders WHERE id = ?",
        ORDER_COLUMNS
    ))
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_order).transpose()
}

/// Persist the lifecycle fields in one save
pub async fn update_lifecycle(pool: &SqlitePool, order: &TtsOrder) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE tts_orders
        SET state = ?, status = ?, output_file = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(order.state.as_str())
    .bind(to_json(&order.status)?)
    .bind(&order.output_file)
    .bind(order.updated_at.to_rfc3339())
    .bind(order.id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}
