//! Health check endpoint
//!
//! Opens a store connection and reports the server version. The probe also
//! checks that the `personas` table exists, so a failed schema step at
//! startup shows up here as `degraded`.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.health().await {
        Ok(probe) if probe.schema_ready => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".into(),
                database: "connected".into(),
                db_version: Some(probe.db_version),
                error: None,
            }),
        ),
        Ok(probe) => {
            tracing::warn!("health: personas table missing");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".into(),
                    database: "connected".into(),
                    db_version: Some(probe.db_version),
                    error: Some("personas table missing".into()),
                }),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".into(),
                    database: "disconnected".into(),
                    db_version: None,
                    error: Some(format!("Health check failed: {}", e)),
                }),
            )
        }
    }
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
