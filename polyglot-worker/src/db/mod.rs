//! Database access for polyglot-worker
//!
//! Store accessors over the shared schema defined in `polyglot-common`.

pub mod articles;
pub mod languages;
