//! # Quill Infrastructure
//!
//! SeaORM implementations of the ports defined in `quill-core`: entity
//! definitions with cascade semantics, the pre-save read-time hook, and
//! the PostgreSQL repositories.

pub mod database;

pub use database::{DatabaseConfig, connect};
