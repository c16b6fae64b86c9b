//! Groupgate Database: SurrealDB-backed identity directory.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - A read-only [`SurrealIdentityRepository`] for member lookups
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::SurrealIdentityRepository;
