//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes:
//! `{"error": <kind>, "message": <text>}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::ConfigError;
use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Malformed request body (400)
    BadRequest { message: String },

    /// National ID already registered (400)
    Duplicate { dni: String },

    /// Other integrity violation reported by the store (400)
    Constraint { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Store settings incomplete (500, logged)
    Config(ConfigError),

    /// Store unreachable (500, logged)
    Connection(DbError),

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::BadRequest { .. }
            | Self::Duplicate { .. }
            | Self::Constraint { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Config(_) | Self::Connection(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(e) => json!({
                "error": "validation_error",
                "message": e.to_string()
            }),
            Self::BadRequest { message } => json!({
                "error": "bad_request",
                "message": message
            }),
            Self::Duplicate { dni } => {
                tracing::info!(dni = %dni, "rejected duplicate dni");
                json!({
                    "error": "duplicate",
                    "message": "DNI ya existe"
                })
            }
            Self::Constraint { message } => json!({
                "error": "constraint_violation",
                "message": message
            }),
            Self::NotFound { resource, id } => json!({
                "error": "not_found",
                "message": not_found_message(resource, id)
            }),
            Self::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                json!({
                    "error": "config_error",
                    "message": format!("Error de configuración de la base de datos: {}", e)
                })
            }
            Self::Connection(e) => {
                tracing::error!("Connection error: {}", e);
                json!({
                    "error": "connection_error",
                    "message": format!("Error de conexión a la base de datos: {}", e)
                })
            }
            Self::Database(e) => {
                tracing::error!("Database error: {}", e);
                json!({
                    "error": "database_error",
                    "message": format!("Error en la base de datos: {}", e)
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

fn not_found_message(resource: &str, id: &str) -> String {
    match resource {
        "persona" => "Persona no encontrada".to_string(),
        other => format!("{} '{}' not found", other, id),
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Duplicate { dni } => Self::Duplicate { dni },
            DbError::Constraint { message } => Self::Constraint { message },
            DbError::Config(e) => Self::Config(e),
            e if e.is_connectivity() => Self::Connection(e),
            e => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "nombre" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "nombre cannot be empty");
    }

    #[tokio::test]
    async fn duplicate_is_400_with_distinct_kind() {
        let response = ApiError::from(DbError::Duplicate { dni: "1".into() }).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "duplicate");
        assert_eq!(body["message"], "DNI ya existe");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::NotFound {
            resource: "persona",
            id: "123".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Persona no encontrada");
    }

    #[tokio::test]
    async fn config_error_is_500() {
        let err = ApiError::from(DbError::Config(ConfigError::Missing { var: "DB_USER" }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "config_error");
    }

    #[tokio::test]
    async fn generic_database_error_includes_message() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::PoolClosed));
        assert!(matches!(err, ApiError::Database(_)));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Error en la base de datos: "));
    }

    #[tokio::test]
    async fn timeout_maps_to_connection_error() {
        let err = ApiError::from(DbError::Timeout { seconds: 10 });
        assert!(matches!(err, ApiError::Connection(_)));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "connection_error");
    }
}
