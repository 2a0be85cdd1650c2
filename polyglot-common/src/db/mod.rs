//! Database initialization and schema
//!
//! All Polyglot services share one SQLite database. Tables are created at
//! startup with idempotent `CREATE TABLE IF NOT EXISTS` statements.

pub mod models;

pub use models::{Article, Language, NewArticle};

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_connection(&pool).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Open an in-memory database with the full schema (tests).
pub async fn init_memory_database() -> Result<SqlitePool> {
    // One connection only: every new connection to sqlite::memory: would
    // otherwise see its own empty database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    configure_connection(&pool).await?;
    init_tables(&pool).await?;
    Ok(pool)
}

async fn configure_connection(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;
    // WAL allows concurrent readers with one writer; queue polling and
    // pipeline writes share this database.
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;
    Ok(())
}

/// Create tables and indexes (idempotent).
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            origin_id INTEGER REFERENCES articles(id),
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            summary TEXT NOT NULL DEFAULT '',
            image TEXT,
            rank INTEGER NOT NULL DEFAULT 1,
            published_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            language TEXT NOT NULL,
            category TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS list_idx ON articles (category, language, rank)",
    )
    .execute(pool)
    .await?;

    // Translation uniqueness: at most one derived row per canonical article
    // and language. Concurrent translate retries converge on this index
    // instead of inserting duplicates.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS translation_idx
        ON articles (origin_id, language)
        WHERE origin_id IS NOT NULL
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS languages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            enabled INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS queue_messages (
            id TEXT PRIMARY KEY,
            body TEXT NOT NULL,
            state TEXT NOT NULL DEFAULT 'pending',
            attempts INTEGER NOT NULL DEFAULT 0,
            available_at INTEGER NOT NULL,
            leased_until INTEGER,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One index per branch of the queue's due-message predicate: pending
    // rows are found by available_at, lapsed leases by leased_until.
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS queue_due_idx ON queue_messages (state, available_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS queue_lease_idx ON queue_messages (state, leased_until)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
