//! personas-server: HTTP service for persona records
//!
//! Maps each HTTP verb on `/personas` to one parameterized statement
//! against a PostgreSQL table. Every request opens its own connection,
//! and the store is the only shared state.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DbSettings};
pub use db::{ConnectionProvider, DbError, PersonaStore, PgPersonaStore};
pub use http::{run_server, ServerConfig, ServerError};
