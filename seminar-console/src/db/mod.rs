//! Database access for seminar-console
//!
//! Raw sqlx over a shared SQLite database. Catalog tables are provisioned
//! by the external admin service; `schema::init_schema` bootstraps them
//! (CREATE TABLE IF NOT EXISTS) so development and test databases work
//! without that service.

pub mod avatars;
pub mod generation_orders;
pub mod schema;
pub mod seminars;
pub mod sessions;
pub mod speakers;
pub mod tts_orders;
pub mod users;
pub mod voices;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool against the shared database file
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    schema::init_schema(&pool).await?;

    Ok(pool)
}

/// Connect to a private in-memory database (tests)
///
/// A single pooled connection keeps every query on the same memory database.
pub async fn connect_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    schema::init_schema(&pool).await?;
    Ok(pool)
}

/// Parse a TEXT uuid column
pub(crate) fn parse_uuid(value: &str, column: &str) -> seminar_common::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| seminar_common::Error::Internal(format!("Bad uuid in {}: {}", column, e)))
}

/// Parse an RFC-3339 TEXT timestamp column
pub(crate) fn parse_timestamp(
    value: &str,
    column: &str,
) -> seminar_common::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            seminar_common::Error::Internal(format!("Bad timestamp in {}: {}", column, e))
        })
}

/// Parse a JSON TEXT column into `T`
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    value: &str,
    column: &str,
) -> seminar_common::Result<T> {
    serde_json::from_str(value)
        .map_err(|e| seminar_common::Error::Internal(format!("Bad JSON in {}: {}", column, e)))
}

/// Serialize a struct into a JSON TEXT column
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> seminar_common::Result<String> {
    serde_json::to_string(value)
        .map_err(|e| seminar_common::Error::Internal(format!("JSON serialize failed: {}", e)))
}
