//! # Polyglot Common Library
//!
//! Shared code for the Polyglot CMS backend services:
//! - Database pool initialization and schema
//! - Domain models (articles, languages)
//! - Job descriptor wire types
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod jobs;

pub use error::{Error, Result};
