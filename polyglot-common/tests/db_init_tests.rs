//! Database initialization tests
//!
//! Verifies schema creation, idempotency, and the translation uniqueness
//! index.

use polyglot_common::db;

#[tokio::test]
async fn init_creates_schema_in_memory() {
    let pool = db::init_memory_database().await.unwrap();

    // All three tables exist and are queryable.
    for table in ["articles", "languages", "queue_messages"] {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&pool).await.unwrap();
        assert_eq!(count, 0, "table {} should start empty", table);
    }
}

#[tokio::test]
async fn init_tables_is_idempotent() {
    let pool = db::init_memory_database().await.unwrap();
    // Second run must not fail on existing tables/indexes.
    db::init_tables(&pool).await.unwrap();
}

#[tokio::test]
async fn init_creates_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("polyglot.db");

    let pool = db::init_database(&db_path).await.unwrap();
    drop(pool);

    assert!(db_path.exists(), "database file should have been created");
}

#[tokio::test]
async fn queue_indexes_cover_both_due_branches() {
    let pool = db::init_memory_database().await.unwrap();

    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'queue_messages'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(names.contains(&"queue_due_idx".to_string()));
    assert!(names.contains(&"queue_lease_idx".to_string()));
}

#[tokio::test]
async fn translation_uniqueness_is_store_enforced() {
    let pool = db::init_memory_database().await.unwrap();

    sqlx::query(
        "INSERT INTO articles (origin_id, title, content, summary, language, category)
         VALUES (NULL, 't', 'c', 's', 'Chinese', 'news')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let insert_translation = "INSERT INTO articles
         (origin_id, title, content, summary, language, category)
         VALUES (1, 't-en', 'c-en', 's-en', 'English', 'news')";

    sqlx::query(insert_translation).execute(&pool).await.unwrap();

    // A second row for the same (origin_id, language) violates the index.
    let err = sqlx::query(insert_translation).execute(&pool).await;
    assert!(err.is_err(), "duplicate (origin_id, language) must be rejected");

    // A different language for the same origin is fine.
    sqlx::query(
        "INSERT INTO articles (origin_id, title, content, summary, language, category)
         VALUES (1, 't-fr', 'c-fr', 's-fr', 'French', 'news')",
    )
    .execute(&pool)
    .await
    .unwrap();

    // Multiple canonical rows (origin_id NULL) are not constrained.
    sqlx::query(
        "INSERT INTO articles (origin_id, title, content, summary, language, category)
         VALUES (NULL, 't2', 'c2', 's2', 'Chinese', 'news')",
    )
    .execute(&pool)
    .await
    .unwrap();
}
