//! Database-backed durable job queue
//!
//! Lease-based at-least-once delivery: `receive` stamps a visibility
//! deadline on each returned message; a message that is neither acked nor
//! retried before the deadline lapses becomes due again and is redelivered.
//! `retry` releases a message immediately; after `max_attempts` deliveries
//! a message is parked as dead instead, whether it reached the cap through
//! explicit retries or through repeated lease expiry.

use crate::queue::{JobQueue, QueueMessage};
use chrono::Utc;
use polyglot_common::config::QueueConfig;
use polyglot_common::jobs::ArticleJob;
use polyglot_common::Result;
use sqlx::{Row, SqlitePool};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const STATE_PENDING: &str = "pending";
const STATE_LEASED: &str = "leased";
const STATE_DEAD: &str = "dead";

/// Durable queue over the `queue_messages` table.
#[derive(Clone)]
pub struct SqliteQueue {
    pool: SqlitePool,
    visibility_timeout: Duration,
    max_attempts: u32,
}

impl SqliteQueue {
    pub fn new(pool: SqlitePool, config: &QueueConfig) -> Self {
        Self {
            pool,
            visibility_timeout: Duration::from_secs(config.visibility_timeout_secs),
            max_attempts: config.max_attempts,
        }
    }

    /// Lease up to `batch_size` due messages.
    ///
    /// Due means pending and available, or leased with a lapsed visibility
    /// deadline (at-least-once redelivery). The lease update and the read
    /// are one statement, so two pollers never lease the same message.
    ///
    /// A lapsed message that has already used up its delivery attempts is
    /// parked as dead here rather than re-leased. `retry` covers explicit
    /// failures; this covers messages that were never acked nor retried,
    /// which would otherwise be redelivered on every lease expiry forever.
    pub async fn receive(&self, batch_size: u32) -> Result<Vec<QueueMessage>> {
        let now = Utc::now().timestamp_millis();
        let leased_until = now + self.visibility_timeout.as_millis() as i64;

        let parked = sqlx::query(
            r#"
            UPDATE queue_messages
            SET state = ?, leased_until = NULL
            WHERE state = ? AND leased_until <= ? AND attempts >= ?
            "#,
        )
        .bind(STATE_DEAD)
        .bind(STATE_LEASED)
        .bind(now)
        .bind(self.max_attempts)
        .execute(&self.pool)
        .await?;
        if parked.rows_affected() > 0 {
            warn!(
                count = parked.rows_affected(),
                "Parked lapsed messages with exhausted delivery attempts as dead"
            );
        }

        let rows = sqlx::query(
            r#"
            UPDATE queue_messages
            SET state = ?, attempts = attempts + 1, leased_until = ?
            WHERE id IN (
                SELECT id FROM queue_messages
                WHERE (state = ? AND available_at <= ?)
                   OR (state = ? AND leased_until <= ?)
                ORDER BY rowid
                LIMIT ?
            )
            RETURNING id, body, attempts
            "#,
        )
        .bind(STATE_LEASED)
        .bind(leased_until)
        .bind(STATE_PENDING)
        .bind(now)
        .bind(STATE_LEASED)
        .bind(now)
        .bind(batch_size)
        .fetch_all(&self.pool)
        .await?;

        let messages: Vec<QueueMessage> = rows
            .iter()
            .map(|row| QueueMessage {
                id: row.get("id"),
                body: row.get("body"),
                attempts: row.get::<i64, _>("attempts") as u32,
            })
            .collect();

        if !messages.is_empty() {
            debug!(count = messages.len(), "Leased queue messages");
        }

        Ok(messages)
    }

    /// Acknowledge a handled message: it is removed and never redelivered.
    pub async fn ack(&self, message_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM queue_messages WHERE id = ?")
            .bind(message_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Release a failed message for immediate redelivery, or park it as
    /// dead once its delivery attempts are exhausted.
    pub async fn retry(&self, message_id: &str) -> Result<()> {
        let row = sqlx::query(
            r#"
            UPDATE queue_messages
            SET state = CASE WHEN attempts >= ? THEN ? ELSE ? END,
                leased_until = NULL,
                available_at = ?
            WHERE id = ?
            RETURNING state
            "#,
        )
        .bind(self.max_attempts)
        .bind(STATE_DEAD)
        .bind(STATE_PENDING)
        .bind(Utc::now().timestamp_millis())
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let state: String = row.get("state");
            if state == STATE_DEAD {
                warn!(message_id, "Message exhausted delivery attempts, parked as dead");
            }
        }

        Ok(())
    }
}

impl JobQueue for SqliteQueue {
    /// Serialize the job envelope and insert a pending message.
    async fn send(&self, job: &ArticleJob) -> Result<()> {
        let body = job.encode()?;
        sqlx::query(
            "INSERT INTO queue_messages (id, body, state, available_at) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&body)
        .bind(STATE_PENDING)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        debug!(%body, "Enqueued job");
        Ok(())
    }
}
