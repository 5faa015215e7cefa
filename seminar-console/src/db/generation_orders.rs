//! Generation order persistence
//!
//! The unique index on seminar_id is the single enforcement point for the
//! one-order-per-seminar rule; concurrent creators race to the constraint.

use sqlx::error::ErrorKind;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use seminar_common::Result;

use super::{parse_json, parse_timestamp, parse_uuid, to_json};
use crate::models::GenerationOrder;

/// Outcome of an insert attempt
#[derive(Debug)]
pub enum CreateOutcome {
    Created(GenerationOrder),
    /// A row for this seminar already exists (unique constraint hit)
    AlreadyExists,
}

/// Insert an order for a seminar, racing on the unique seminar_id index
pub async fn create(pool: &SqlitePool, order: &GenerationOrder) -> Result<CreateOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO generation_orders (id, state, status, created_at, seminar_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(order.id.to_string())
    .bind(&order.state)
    .bind(to_json(&order.status)?)
    .bind(order.created_at.to_rfc3339())
    .bind(order.seminar.to_string())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(CreateOutcome::Created(order.clone())),
        Err(sqlx::Error::Database(db_err)) if db_err.kind() == ErrorKind::UniqueViolation => {
            Ok(CreateOutcome::AlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the order attached to a seminar, if any
pub async fn get_by_seminar(pool: &SqlitePool, seminar: Uuid) -> Result<Option<GenerationOrder>> {
    let row = sqlx::query(
        "SELECT id, state, status, created_at, seminar_id FROM generation_orders WHERE seminar_id = ?",
    )
    .bind(seminar.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(GenerationOrder {
            id: parse_uuid(&row.get::<String, _>("id"), "generation_orders.id")?,
            state: row.get("state"),
            status: parse_json(&row.get::<String, _>("status"), "generation_orders.status")?,
            created_at: parse_timestamp(
                &row.get::<String, _>("created_at"),
                "generation_orders.created_at",
            )?,
            seminar: parse_uuid(
                &row.get::<String, _>("seminar_id"),
                "generation_orders.seminar_id",
            )?,
        })
    })
    .transpose()
}
