//! Table bootstrap
//!
//! The admin service owns the catalog schema in production; creating the
//! tables here (IF NOT EXISTS) keeps development databases and the test
//! suite self-contained. Console-owned tables: users, sessions, tts_orders.

use anyhow::Result;
use sqlx::SqlitePool;

/// Create all tables and indexes if they don't exist
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL DEFAULT '',
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            password_hash TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            access_token TEXT,
            token_expires_at TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS voices (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            code TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            sample TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS avatars (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            portrait TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL DEFAULT 'user',
            owner_id TEXT NOT NULL,
            motions TEXT NOT NULL DEFAULT '{"silent":"","talking":""}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS avatar_actions (
            id TEXT PRIMARY KEY,
            type TEXT NOT NULL DEFAULT 'silent',
            description TEXT NOT NULL DEFAULT '',
            avatar_id TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS speakers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            avatar_id TEXT,
            voice_id TEXT,
            owner_id TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT 'user',
            motions TEXT NOT NULL DEFAULT '{"silent":"","talking":""}',
            covers TEXT NOT NULL DEFAULT '{"_16x9":"","_4x3":""}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS seminars (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            owner_id TEXT NOT NULL,
            state TEXT NOT NULL DEFAULT 'empty',
            speaker_id TEXT,
            cover TEXT,
            status TEXT NOT NULL DEFAULT '{"progress":0,"queuing":0,"step":0}',
            resources TEXT NOT NULL DEFAULT '{"slides":[]}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    // seminar_id UNIQUE: at most one generation order per seminar,
    // enforced by the store rather than check-then-act
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS generation_orders (
            id TEXT PRIMARY KEY,
            state TEXT NOT NULL DEFAULT 'pending',
            status TEXT NOT NULL DEFAULT '{"description":""}',
            created_at TEXT NOT NULL,
            seminar_id TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tts_orders (
            id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            spk_id TEXT NOT NULL,
            state TEXT NOT NULL DEFAULT 'pending',
            status TEXT NOT NULL DEFAULT '{"progress":0,"error":""}',
            output_file TEXT NOT NULL DEFAULT '',
            owner_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized");

    Ok(())
}
