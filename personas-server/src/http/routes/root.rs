//! Service banner

use axum::{routing::get, Json, Router};
use serde::Serialize;

pub const WELCOME_MESSAGE: &str = "Bienvenido al Web Service de Tommy Jeans";

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// GET /
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: WELCOME_MESSAGE,
    })
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(root))
}
