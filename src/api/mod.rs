//! HTTP API layer for the event service.
//!
//! Provides the REST endpoints for the event resource and login.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
