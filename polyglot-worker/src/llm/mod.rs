//! Language model integration
//!
//! Wraps a remote OpenAI-compatible chat-completions endpoint behind two
//! operations: summarize and translate. Stateless request/response; no
//! caching, batching, or streaming.

pub mod client;
pub mod prompts;

pub use client::{CompletionBackend, LlmClient, LlmError};
