//! Router harness for handler tests

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use super::server::{build_router, AppState, ServerConfig};
use crate::config::DbSettings;
use crate::db::PersonaStore;

pub(crate) struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub(crate) fn new(store: impl PersonaStore) -> Self {
        Self::with_settings(store, DbSettings::default(), false)
    }

    pub(crate) fn with_settings(
        store: impl PersonaStore,
        settings: DbSettings,
        debug_endpoints: bool,
    ) -> Self {
        let state = Arc::new(AppState::new(Arc::new(store), settings));
        let config = ServerConfig {
            debug_endpoints,
            ..ServerConfig::default()
        };
        Self {
            router: build_router(state, &config),
        }
    }
}

/// Send one request and decode the JSON response (Null for empty bodies).
pub(crate) async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => Request::builder().method(method).uri(uri).body(Body::empty()),
    }
    .unwrap();

    send_raw(router, request).await
}

pub(crate) async fn send_raw(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}
