//! Route handlers organized by resource

pub mod debug;
pub mod health;
pub mod personas;
pub mod root;
