//! Pedigree Registry - cat pedigree records over a REST API
//!
//! Memoizes statistics in a TTL cache and suggests sequential pedigree IDs.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pedigree;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{AppError, Result};
pub use tasks::spawn_cleanup_task;
