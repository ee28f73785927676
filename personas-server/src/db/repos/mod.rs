//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows a single connection, never a pool
//! - Handles conflicts via constraint errors (no check-then-insert)
//! - Uses transactions for every mutation

pub mod personas;

pub use personas::{PersonaRecord, PersonaRepo};
