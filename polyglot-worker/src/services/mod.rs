//! Pipeline services

pub mod orchestrator;

pub use orchestrator::{PipelineError, TranslationOrchestrator};
