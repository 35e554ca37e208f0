//! Table definitions, created at startup if missing.
//!
//! Uniqueness lives in the schema so concurrent writers are still caught;
//! required/min-length checks run in the repositories before each insert.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

const STATEMENTS: &[(&str, &str)] = &[
    (
        "authors",
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE,
            born INTEGER,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "books",
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL UNIQUE,
            published INTEGER NOT NULL,
            author_id TEXT NOT NULL REFERENCES authors(id),
            genres TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "idx_books_author_id",
        "CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)",
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            favorite_genre TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    ),
];

/// Create missing tables and indexes. Safe to run on every start.
pub async fn sync_schema(pool: &SqlitePool) -> Result<()> {
    for (name, sql) in STATEMENTS {
        debug!(object = %name, "Syncing schema object");
        sqlx::query(sql)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create {}", name))?;
    }
    info!(objects = STATEMENTS.len(), "Schema sync complete");
    Ok(())
}
