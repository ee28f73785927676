//! Configuration introspection, only mounted with debug endpoints enabled

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::http::server::AppState;

/// GET /debug/env - which store variables are set; password masked
async fn debug_env(State(state): State<Arc<AppState>>) -> Json<BTreeMap<&'static str, Option<String>>> {
    Json(state.db_settings.redacted().into_iter().collect())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/debug/env", get(debug_env))
}
