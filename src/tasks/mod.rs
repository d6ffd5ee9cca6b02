//! Background Tasks
//!
//! Long-running tokio tasks started alongside the HTTP server.
//!
//! # Tasks
//! - Cache sweep: drops expired statistics entries every `CLEANUP_INTERVAL` seconds

mod cleanup;

pub use cleanup::spawn_cleanup_task;
