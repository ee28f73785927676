//! Database layer - connection provider, schema and repositories
//!
//! # Design Principles
//!
//! - One connection per call, closed on every exit path - no pool
//! - One parameterized statement per operation
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Mutations commit on success and roll back on any error

pub mod connection;
pub mod error;
pub mod repos;
pub mod schema;
pub mod store;

#[cfg(test)]
pub(crate) mod memory;

pub use connection::ConnectionProvider;
pub use error::DbError;
pub use repos::{PersonaRecord, PersonaRepo};
pub use store::{PersonaStore, PgPersonaStore, StoreHealth};
