//! polyglot-worker library interface
//!
//! Exposes the pipeline building blocks for integration testing: the LLM
//! client, article store accessors, the durable job queue, the dispatcher,
//! and the translation orchestrator.

pub mod db;
pub mod llm;
pub mod queue;
pub mod services;

pub use llm::{CompletionBackend, LlmClient, LlmError};
pub use queue::{JobQueue, SqliteQueue};
pub use services::TranslationOrchestrator;
