//! Language store operations

use polyglot_common::db::Language;
use polyglot_common::Result;
use sqlx::{Row, SqlitePool};

/// List the enabled target languages for translation fan-out.
///
/// Disabled languages are excluded here so the orchestrator never enqueues
/// work for them.
pub async fn list_enabled_languages(pool: &SqlitePool) -> Result<Vec<Language>> {
    let rows = sqlx::query("SELECT id, name, enabled FROM languages WHERE enabled = 1 ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| Language {
            id: row.get("id"),
            name: row.get("name"),
            enabled: row.get::<i64, _>("enabled") != 0,
        })
        .collect())
}
