//! Sync phase: authenticate through an SSH agent and mirror the staging area.
//!
//! The agent's connection details are captured in an [`AgentSession`] value
//! and handed to every process that needs them; the current process's
//! environment is left untouched.

pub mod agent;
pub mod credentials;
pub mod transfer;

pub use agent::{AgentBridge, AgentSession};
pub use credentials::{resolve_key, KeyMaterial};
pub use transfer::{build_transfer, remote_target};
