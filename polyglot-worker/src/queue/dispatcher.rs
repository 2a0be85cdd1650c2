//! Job dispatcher
//!
//! Consumes one leased batch at a time: parse each message into a typed
//! job, run the matching orchestrator action, and decide the message's
//! fate. Messages within a batch are handled concurrently with no ordering
//! guarantee; each ack/retry decision is independent.

use crate::llm::CompletionBackend;
use crate::queue::{JobQueue, QueueMessage};
use crate::services::TranslationOrchestrator;
use polyglot_common::jobs::ArticleJob;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Per-message dispatch decision.
///
/// State machine per job: received → dispatched → acknowledged or
/// retry-requested. `Leave` makes no decision at all: the message keeps its
/// lease and falls back to visibility-timeout redelivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Handler succeeded; remove the message.
    Ack,
    /// Handler failed or timed out; release for redelivery.
    Retry,
    /// Unparseable or unknown job; no explicit decision.
    Leave,
}

/// Dispatches leased queue messages into the translation pipeline.
pub struct Dispatcher<Q, C> {
    orchestrator: TranslationOrchestrator<Q, C>,
    handler_timeout: Duration,
}

impl<Q, C> Dispatcher<Q, C>
where
    Q: JobQueue + Sync,
    C: CompletionBackend + Sync,
{
    pub fn new(orchestrator: TranslationOrchestrator<Q, C>, handler_timeout: Duration) -> Self {
        Self {
            orchestrator,
            handler_timeout,
        }
    }

    /// Handle a whole batch concurrently, returning every message paired
    /// with its outcome. Returns only after all messages are decided.
    pub async fn handle_batch(
        &self,
        messages: Vec<QueueMessage>,
    ) -> Vec<(QueueMessage, Outcome)> {
        let handlers = messages.into_iter().map(|message| async move {
            let outcome = self.handle_message(&message).await;
            (message, outcome)
        });
        futures::future::join_all(handlers).await
    }

    async fn handle_message(&self, message: &QueueMessage) -> Outcome {
        let job = match ArticleJob::decode(&message.body) {
            Ok(job) => job,
            Err(e) => {
                // No handler registered for this message; leave it to the
                // queue's own redelivery policy.
                warn!(
                    message_id = %message.id,
                    error = %e,
                    "Ignoring undispatchable queue message"
                );
                return Outcome::Leave;
            }
        };

        debug!(message_id = %message.id, attempts = message.attempts, ?job, "Dispatching job");

        let action = async {
            match &job {
                ArticleJob::Init { article_id } => self.orchestrator.init(*article_id).await,
                ArticleJob::Translate {
                    article_id,
                    language,
                } => self.orchestrator.translate(*article_id, language).await,
            }
        };

        // The timeout drops our side of the handler future; remote calls
        // already in flight may still land after the retry is requested.
        match tokio::time::timeout(self.handler_timeout, action).await {
            Ok(Ok(())) => Outcome::Ack,
            Ok(Err(e)) => {
                error!(message_id = %message.id, error = %e, "Job handler failed");
                Outcome::Retry
            }
            Err(_) => {
                error!(
                    message_id = %message.id,
                    timeout_secs = self.handler_timeout.as_secs(),
                    "Job handler timed out"
                );
                Outcome::Retry
            }
        }
    }
}
