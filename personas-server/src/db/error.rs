//! Database error type

use sqlx::error::ErrorKind;

use crate::config::ConfigError;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database connection timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("duplicate dni '{dni}'")]
    Duplicate { dni: String },

    #[error("constraint violation: {message}")]
    Constraint { message: String },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Map an INSERT failure onto the constraint taxonomy.
    ///
    /// Unique violations become [`DbError::Duplicate`]; any other integrity
    /// violation becomes [`DbError::Constraint`].
    pub fn from_insert(err: sqlx::Error, dni: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return Self::Duplicate {
                        dni: dni.to_owned(),
                    }
                }
                ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
                | ErrorKind::ForeignKeyViolation => {
                    return Self::Constraint {
                        message: db_err.message().to_owned(),
                    }
                }
                _ => {}
            }
        }
        Self::Sqlx(err)
    }

    /// True for failures to reach the store at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Timeout { .. })
    }
}
