//! Translation orchestrator
//!
//! Coordinates the two pipeline actions. `init` summarizes a freshly
//! created canonical article and fans out one translate job per enabled
//! language; `translate` produces or refreshes the single derived row for
//! one (article, language) pair. The orchestrator owns no state beyond
//! what it reads and writes through the store.

use crate::db::{articles, languages};
use crate::llm::{CompletionBackend, LlmError};
use crate::queue::JobQueue;
use polyglot_common::config::PipelineConfig;
use polyglot_common::db::NewArticle;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

/// Pipeline action errors. Either kind aborts the running action and
/// surfaces to the dispatcher as a retry request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] polyglot_common::Error),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

pub struct TranslationOrchestrator<Q, C> {
    db: SqlitePool,
    llm: C,
    queue: Q,
    summary_length: u32,
    max_rank: Option<i64>,
}

impl<Q, C> TranslationOrchestrator<Q, C>
where
    Q: JobQueue + Sync,
    C: CompletionBackend + Sync,
{
    pub fn new(db: SqlitePool, llm: C, queue: Q, pipeline: &PipelineConfig) -> Self {
        Self {
            db,
            llm,
            queue,
            summary_length: pipeline.summary_length,
            max_rank: pipeline.max_rank,
        }
    }

    /// Initialize a freshly created article: persist a model-produced
    /// summary, then enqueue one translate job per enabled language other
    /// than the article's own.
    ///
    /// A missing article is a logged no-op, not an error. A failure after
    /// the summary write does not roll it back; redelivered `init` jobs
    /// simply redo the summary, which is idempotent.
    pub async fn init(&self, article_id: i64) -> Result<(), PipelineError> {
        let Some(mut article) = articles::get_article(&self.db, article_id).await? else {
            info!(article_id, "Article not found, nothing to initialize");
            return Ok(());
        };

        let summary = self
            .llm
            .summarize(&article.content, self.summary_length)
            .await?;
        article.summary = summary;
        articles::update_article(&self.db, &article).await?;

        let targets = languages::list_enabled_languages(&self.db).await?;
        let mut fanned_out = 0;
        for language in &targets {
            if language.name == article.language {
                continue;
            }
            self.queue
                .enqueue_translate(article_id, &language.name)
                .await?;
            fanned_out += 1;
        }

        info!(article_id, fanned_out, "Article initialized");
        Ok(())
    }

    /// Translate one article into `target_language` and upsert the derived
    /// row keyed by (origin_id, language).
    ///
    /// Title, summary and content are translated sequentially in that
    /// order; nothing is written unless all three calls succeed, so a
    /// failed action leaves no partially translated row behind.
    pub async fn translate(
        &self,
        article_id: i64,
        target_language: &str,
    ) -> Result<(), PipelineError> {
        let Some(article) = articles::get_article(&self.db, article_id).await? else {
            info!(article_id, "Article not found, nothing to translate");
            return Ok(());
        };

        let title = self
            .llm
            .translate(&article.title, &article.language, target_language)
            .await?;
        let summary = self
            .llm
            .translate(&article.summary, &article.language, target_language)
            .await?;
        let content = self
            .llm
            .translate(&article.content, &article.language, target_language)
            .await?;

        let existing =
            articles::get_by_origin_and_language(&self.db, article_id, target_language).await?;
        match existing {
            Some(translated) => {
                articles::update_translation(&self.db, translated.id, &title, &summary, &content)
                    .await?;
                info!(article_id, language = target_language, "Translation refreshed");
            }
            None => {
                // Rank inversion applies on insert only; updates never
                // touch rank.
                let rank = match self.max_rank {
                    Some(max_rank) => max_rank - article.rank,
                    None => article.rank,
                };
                articles::insert_article(
                    &self.db,
                    &NewArticle {
                        origin_id: Some(article_id),
                        title,
                        content,
                        summary,
                        image: article.image.clone(),
                        rank,
                        published_at: article.published_at.clone(),
                        language: target_language.to_string(),
                        category: article.category.clone(),
                    },
                )
                .await?;
                info!(article_id, language = target_language, "Translation created");
            }
        }

        Ok(())
    }
}
