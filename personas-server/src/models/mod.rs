//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod persona;
pub mod validation;

pub use persona::{Dni, Email, NewPersona, PersonName, PersonaUpdate};
pub use validation::ValidationError;
