//! Job queue and dispatch
//!
//! The queue is a durable at-least-once delivery channel backed by the
//! shared database: producers insert job envelopes, the worker leases
//! batches, and each message is individually acknowledged or released for
//! redelivery. No ordering or deduplication is guaranteed beyond
//! at-least-once delivery.

pub mod dispatcher;
pub mod store;

pub use dispatcher::{Dispatcher, Outcome};
pub use store::SqliteQueue;

use polyglot_common::jobs::ArticleJob;
use polyglot_common::Result;
use std::future::Future;

/// One leased queue message.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub id: String,
    /// JSON-encoded job envelope.
    pub body: String,
    /// Delivery attempts so far, including the current one.
    pub attempts: u32,
}

/// Producer side of the job queue.
///
/// The orchestrator fans out through this trait; whatever stores a new
/// article enqueues the initial job the same way. Consumer-side operations
/// (receive/ack/retry) live on the concrete [`SqliteQueue`], the worker
/// loop is the only consumer.
pub trait JobQueue {
    fn send(&self, job: &ArticleJob) -> impl Future<Output = Result<()>> + Send;

    /// Enqueue the post-create pipeline for a freshly stored article.
    fn enqueue_init(&self, article_id: i64) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sync,
    {
        async move { self.send(&ArticleJob::Init { article_id }).await }
    }

    /// Enqueue translation of `article_id` into `language`.
    fn enqueue_translate(
        &self,
        article_id: i64,
        language: &str,
    ) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sync,
    {
        let job = ArticleJob::Translate {
            article_id,
            language: language.to_string(),
        };
        async move { self.send(&job).await }
    }
}
