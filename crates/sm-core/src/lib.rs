//! sm-core: shared types, errors, and settings for sync-media.
//!
//! This crate is the foundational dependency for the other sm-* crates and
//! the `sync-media` binary, providing the unified error type, the document
//! identifier parsed from blob file names, and the settings tree.

pub mod config;
pub mod error;
pub mod ids;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::DocumentId;
