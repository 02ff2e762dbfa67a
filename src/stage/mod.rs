//! Staging phase: rebuild the local tree that the transfer mirrors.
//!
//! [`area`] owns the directory layout (`audio/`, `images/`) and its
//! clear-and-recreate lifecycle. [`transcode`] turns each source blob into its
//! derived artifacts inside that tree.

pub mod area;
pub mod transcode;

pub use area::{list_blobs, StagingArea};
pub use transcode::{ImageVariant, MediaKind, StagedItem, Transcoder};
