//! Persona endpoints
//!
//! Each handler validates its input, makes exactly one store call and maps
//! the outcome to a status code. Validation failures never reach the store.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::PersonaRecord;
use crate::http::error::ApiError;
use crate::http::extractors::{DniPath, JsonBody};
use crate::http::server::AppState;
use crate::models::{NewPersona, PersonaUpdate};

/// Create persona request
#[derive(Debug, Deserialize)]
pub struct CreatePersonaRequest {
    pub dni: String,
    pub nombre: String,
    pub apellido: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Update persona request.
///
/// A `dni` in the body is accepted and ignored; the path decides.
#[derive(Debug, Deserialize)]
pub struct UpdatePersonaRequest {
    #[serde(default)]
    pub dni: Option<String>,
    pub nombre: String,
    pub apellido: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Persona response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaResponse {
    pub id: i32,
    pub dni: String,
    pub nombre: String,
    pub apellido: String,
    pub email: Option<String>,
}

impl From<PersonaRecord> for PersonaResponse {
    fn from(p: PersonaRecord) -> Self {
        Self {
            id: p.id,
            dni: p.dni,
            nombre: p.nombre,
            apellido: p.apellido,
            email: p.email,
        }
    }
}

/// Confirmation body for deletes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /personas - create a persona
async fn create_persona(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreatePersonaRequest>,
) -> Result<(StatusCode, Json<PersonaResponse>), ApiError> {
    let persona = NewPersona::new(&req.dni, &req.nombre, &req.apellido, req.email.as_deref())?;
    let created = state.store.create(persona).await?;

    tracing::info!(id = created.id, dni = %created.dni, "persona created");
    Ok((StatusCode::CREATED, Json(PersonaResponse::from(created))))
}

/// GET /personas - all personas by ascending id
async fn list_personas(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PersonaResponse>>, ApiError> {
    let personas = state.store.list().await?;
    Ok(Json(personas.into_iter().map(PersonaResponse::from).collect()))
}

/// GET /personas/{dni}
async fn get_persona(
    State(state): State<Arc<AppState>>,
    DniPath(dni): DniPath,
) -> Result<Json<PersonaResponse>, ApiError> {
    let persona = state.store.get(&dni).await?;
    Ok(Json(PersonaResponse::from(persona)))
}

/// PUT /personas/{dni} - replace nombre, apellido and email
async fn update_persona(
    State(state): State<Arc<AppState>>,
    DniPath(dni): DniPath,
    JsonBody(req): JsonBody<UpdatePersonaRequest>,
) -> Result<Json<PersonaResponse>, ApiError> {
    if let Some(body_dni) = req.dni.as_deref() {
        if body_dni != dni.as_str() {
            tracing::debug!(path = %dni, body = body_dni, "ignoring dni in update body");
        }
    }

    let update = PersonaUpdate::new(&req.nombre, &req.apellido, req.email.as_deref())?;
    let updated = state.store.update(&dni, update).await?;

    tracing::info!(id = updated.id, dni = %dni, "persona updated");
    Ok(Json(PersonaResponse::from(updated)))
}

/// DELETE /personas/{dni}
async fn delete_persona(
    State(state): State<Arc<AppState>>,
    DniPath(dni): DniPath,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(&dni).await?;

    tracing::info!(dni = %dni, "persona deleted");
    Ok(Json(MessageResponse {
        message: format!("Persona con DNI {} eliminada exitosamente", dni),
    }))
}

/// Persona routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/personas", get(list_personas).post(create_persona))
        .route(
            "/personas/{dni}",
            get(get_persona).put(update_persona).delete(delete_persona),
        )
}
