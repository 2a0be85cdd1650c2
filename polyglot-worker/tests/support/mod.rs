//! Shared test doubles and seed helpers for integration tests.
#![allow(dead_code)]

use polyglot_common::jobs::ArticleJob;
use polyglot_common::Result;
use polyglot_worker::{CompletionBackend, JobQueue, LlmError};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Deterministic completion backend: summaries come back as
/// `summary(<budget>):<text>`, translations as `[<target>] <text>`.
#[derive(Default)]
pub struct ScriptedLlm {
    pub summarize_calls: AtomicUsize,
    pub translate_calls: AtomicUsize,
    /// 1-based index of the translate call that should fail.
    pub fail_on_translate_call: Option<usize>,
    /// Delay injected before every call (timeout tests).
    pub delay: Option<Duration>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_translate_call(call: usize) -> Self {
        Self {
            fail_on_translate_call: Some(call),
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

impl CompletionBackend for &ScriptedLlm {
    async fn summarize(&self, text: &str, max_length: u32) -> std::result::Result<String, LlmError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("summary({}):{}", max_length, text))
    }

    async fn translate(
        &self,
        text: &str,
        _from_language: &str,
        to_language: &str,
    ) -> std::result::Result<String, LlmError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let call = self.translate_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_translate_call == Some(call) {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(format!("[{}] {}", to_language, text))
    }
}

/// Producer fake that records every job instead of delivering it.
#[derive(Default)]
pub struct RecordingQueue {
    sent: Mutex<Vec<ArticleJob>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<ArticleJob> {
        self.sent.lock().unwrap().clone()
    }
}

impl JobQueue for &RecordingQueue {
    async fn send(&self, job: &ArticleJob) -> Result<()> {
        self.sent.lock().unwrap().push(job.clone());
        Ok(())
    }
}

/// Insert a canonical article row, returning its assigned id.
pub async fn seed_article(
    pool: &SqlitePool,
    title: &str,
    content: &str,
    summary: &str,
    language: &str,
    rank: i64,
) -> i64 {
    let result = sqlx::query(
        r#"
        INSERT INTO articles (origin_id, title, content, summary, image, rank,
                              published_at, language, category)
        VALUES (NULL, ?, ?, ?, 'cover.png', ?, '2026-01-01T00:00:00+00:00', ?, 'news')
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(summary)
    .bind(rank)
    .bind(language)
    .execute(pool)
    .await
    .unwrap();
    result.last_insert_rowid()
}

pub async fn seed_language(pool: &SqlitePool, name: &str, enabled: bool) {
    sqlx::query("INSERT INTO languages (name, enabled) VALUES (?, ?)")
        .bind(name)
        .bind(enabled as i64)
        .execute(pool)
        .await
        .unwrap();
}

/// Count stored translations for one (origin, language) pair.
pub async fn translation_count(pool: &SqlitePool, origin_id: i64, language: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE origin_id = ? AND language = ?")
        .bind(origin_id)
        .bind(language)
        .fetch_one(pool)
        .await
        .unwrap()
}
