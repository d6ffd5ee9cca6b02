//! API Module
//!
//! HTTP handlers and routing for the pedigree registry REST API.
//!
//! # Endpoints
//! - `/pedigrees` - Pedigree records, next-ID suggestion, statistics, family trees
//! - `/cache` - Statistics cache diagnostics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
