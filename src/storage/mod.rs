//! Storage layer for the event service.
//!
//! Provides database access via SQLx with SQLite.

mod models;
mod repository;

pub use repository::EventRepository;

#[cfg(test)]
pub use repository::setup_test_db;
