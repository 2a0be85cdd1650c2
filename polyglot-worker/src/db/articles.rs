//! Article store operations

use polyglot_common::db::{Article, NewArticle};
use polyglot_common::{Error, Result};
use sqlx::{Row, SqlitePool};

fn article_from_row(row: &sqlx::sqlite::SqliteRow) -> Article {
    Article {
        id: row.get("id"),
        origin_id: row.get("origin_id"),
        title: row.get("title"),
        content: row.get("content"),
        summary: row.get("summary"),
        image: row.get("image"),
        rank: row.get("rank"),
        published_at: row.get("published_at"),
        language: row.get("language"),
        category: row.get("category"),
    }
}

const ARTICLE_COLUMNS: &str =
    "id, origin_id, title, content, summary, image, rank, published_at, language, category";

/// Load article by id
pub async fn get_article(pool: &SqlitePool, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE id = ?",
        ARTICLE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(article_from_row))
}

/// Load the translated copy of `origin_id` in `language`, if one exists
pub async fn get_by_origin_and_language(
    pool: &SqlitePool,
    origin_id: i64,
    language: &str,
) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE origin_id = ? AND language = ?",
        ARTICLE_COLUMNS
    ))
    .bind(origin_id)
    .bind(language)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(article_from_row))
}

/// Insert a new article row, returning the stored row with its assigned id.
///
/// For translated rows (`origin_id` present) the insert converges on the
/// `(origin_id, language)` uniqueness index: a racing duplicate updates the
/// existing row's text fields instead of failing, so redelivered translate
/// jobs can never produce two rows for the same pair.
pub async fn insert_article(pool: &SqlitePool, article: &NewArticle) -> Result<Article> {
    let result = sqlx::query(
        r#"
        INSERT INTO articles (
            origin_id, title, content, summary, image, rank,
            published_at, language, category
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(origin_id, language) WHERE origin_id IS NOT NULL
        DO UPDATE SET
            title = excluded.title,
            summary = excluded.summary,
            content = excluded.content
        "#,
    )
    .bind(article.origin_id)
    .bind(&article.title)
    .bind(&article.content)
    .bind(&article.summary)
    .bind(&article.image)
    .bind(article.rank)
    .bind(&article.published_at)
    .bind(&article.language)
    .bind(&article.category)
    .execute(pool)
    .await?;

    let stored = match article.origin_id {
        Some(origin_id) => get_by_origin_and_language(pool, origin_id, &article.language).await?,
        None => get_article(pool, result.last_insert_rowid()).await?,
    };

    stored.ok_or_else(|| Error::Internal("inserted article row not found".to_string()))
}

/// Overwrite all mutable fields of an existing article row
pub async fn update_article(pool: &SqlitePool, article: &Article) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE articles SET
            origin_id = ?, title = ?, content = ?, summary = ?, image = ?,
            rank = ?, published_at = ?, language = ?, category = ?
        WHERE id = ?
        "#,
    )
    .bind(article.origin_id)
    .bind(&article.title)
    .bind(&article.content)
    .bind(&article.summary)
    .bind(&article.image)
    .bind(article.rank)
    .bind(&article.published_at)
    .bind(&article.language)
    .bind(&article.category)
    .bind(article.id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Refresh the three translated text fields of an existing row in place,
/// leaving metadata (rank, image, published_at, category) untouched
pub async fn update_translation(
    pool: &SqlitePool,
    id: i64,
    title: &str,
    summary: &str,
    content: &str,
) -> Result<()> {
    sqlx::query("UPDATE articles SET title = ?, summary = ?, content = ? WHERE id = ?")
        .bind(title)
        .bind(summary)
        .bind(content)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
