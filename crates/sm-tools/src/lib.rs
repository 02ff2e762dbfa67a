//! # sm-tools
//!
//! External tool plumbing for sync-media.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to
//!   ssh-agent, ssh-add and rsync.
//! - **Command execution** ([`ToolCommand`]) -- blocking builder for running
//!   external processes with piped stdin and per-child environment.
//! - **Runner seam** ([`CommandRunner`], [`SystemRunner`]) -- the trait the
//!   sync phase drives processes through, so callers can substitute a
//!   recording runner.

pub mod command;
pub mod runner;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use runner::{CommandRunner, SystemRunner};
pub use tools::{ToolInfo, ToolRegistry, KNOWN_TOOLS};
