//! polyglot-worker - Article translation pipeline worker
//!
//! Consumes article jobs from the durable queue and drives the
//! summarize-then-translate pipeline against the shared database. HTTP
//! handlers (separate service) only ever enqueue; this binary is the sole
//! consumer.

use anyhow::Result;
use clap::Parser;
use polyglot_common::config::TomlConfig;
use polyglot_worker::queue::{Dispatcher, Outcome, SqliteQueue};
use polyglot_worker::{CompletionBackend, JobQueue, LlmClient, TranslationOrchestrator};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "polyglot-worker", about = "Article translation pipeline worker")]
struct Args {
    /// Config file path (default: platform config dir, or POLYGLOT_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database file path override
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting polyglot-worker");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = TomlConfig::load(args.config.as_ref())?;
    if let Some(database) = args.database {
        config.database.path = database;
    }

    info!("Database: {}", config.database.path.display());
    let pool = polyglot_common::db::init_database(&config.database.path).await?;

    let llm_config = config.llm_config()?;
    info!(
        provider = %config.llm.provider,
        model = %llm_config.model,
        "Language model client configured"
    );
    let llm = LlmClient::new(llm_config)?;

    let queue = SqliteQueue::new(pool.clone(), &config.queue);
    let orchestrator =
        TranslationOrchestrator::new(pool.clone(), llm, queue.clone(), &config.pipeline);
    let dispatcher = Dispatcher::new(
        orchestrator,
        Duration::from_secs(config.queue.handler_timeout_secs),
    );

    run_worker(&queue, &dispatcher, &config).await?;

    info!("polyglot-worker stopped");
    Ok(())
}

/// Poll-dispatch loop: lease a batch, decide every message, apply the
/// decisions, repeat. Sleeps between polls when the queue is empty. Ctrl-c
/// stops the loop whether it is idle or mid-batch; an abandoned batch is
/// redelivered via lease expiry.
async fn run_worker<Q, C>(
    queue: &SqliteQueue,
    dispatcher: &Dispatcher<Q, C>,
    config: &TomlConfig,
) -> Result<()>
where
    Q: JobQueue + Sync,
    C: CompletionBackend + Sync,
{
    let poll_interval = Duration::from_secs(config.queue.poll_interval_secs);

    loop {
        let batch = queue.receive(config.queue.batch_size).await?;

        if batch.is_empty() {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    return Ok(());
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }
            continue;
        }

        // Abandoning an in-flight batch on shutdown is safe: undecided
        // messages keep their leases and are redelivered after expiry.
        let outcomes = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                return Ok(());
            }
            outcomes = dispatcher.handle_batch(batch) => outcomes,
        };

        for (message, outcome) in outcomes {
            match outcome {
                Outcome::Ack => queue.ack(&message.id).await?,
                Outcome::Retry => queue.retry(&message.id).await?,
                // Leave: lease expiry hands the message back to the queue.
                Outcome::Leave => {}
            }
        }
    }
}
