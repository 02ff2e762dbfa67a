//! sync-media - stage media derivatives and mirror them to the
//! content-distribution host.
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod controller;
pub mod logging;
pub mod stage;
pub mod sync;
