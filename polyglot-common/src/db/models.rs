//! Database models

use serde::{Deserialize, Serialize};

/// One unit of content in one language.
///
/// A canonical article has `origin_id = None` and is the single source of
/// truth for its content. Translated rows carry `origin_id = Some(canonical
/// id)` and are derived copies; at most one row exists per
/// `(origin_id, language)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub origin_id: Option<i64>,
    pub title: String,
    pub content: String,
    /// Model-produced abstract, not user-authored for canonical articles.
    pub summary: String,
    pub image: Option<String>,
    pub rank: i64,
    pub published_at: String,
    pub language: String,
    pub category: String,
}

/// Insert payload for a new article row (id is store-assigned).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub origin_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub image: Option<String>,
    pub rank: i64,
    pub published_at: String,
    pub language: String,
    pub category: String,
}

/// A supported target language for translation fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub id: i64,
    /// Matched against `Article::language` values.
    pub name: String,
    /// Disabled languages are skipped during fan-out.
    pub enabled: bool,
}
