//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Schema initialization before accepting requests
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::DbSettings;
use crate::db::{DbError, PersonaStore};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Expose `/debug/env`. Never enable in production.
    pub debug_endpoints: bool,

    /// Abort startup when the table cannot be created
    /// instead of serving in degraded mode.
    pub strict_schema: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            cors_permissive: false,
            debug_endpoints: false,
            strict_schema: false,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn PersonaStore>,
    /// Settings the store was built from, for `/debug/env`
    pub db_settings: DbSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn PersonaStore>, db_settings: DbSettings) -> Self {
        Self { store, db_settings }
    }
}

/// Build the application router.
///
/// `/debug/env` is only routed when `config.debug_endpoints` is set.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        let port = config.bind_addr.port();
        let origins: Vec<HeaderValue> = [
            format!("http://localhost:{}", port),
            format!("http://127.0.0.1:{}", port),
        ]
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let mut router = Router::new()
        .merge(routes::root::router())
        .merge(routes::health::router())
        .merge(routes::personas::router());

    if config.debug_endpoints {
        tracing::warn!("Debug endpoints enabled - /debug/env exposes configuration");
        router = router.merge(routes::debug::router());
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the personas table before serving.
///
/// Failure is logged and swallowed unless `strict` is set; `/health`
/// reports `degraded` for as long as the table is missing.
pub async fn prepare_schema(store: &dyn PersonaStore, strict: bool) -> Result<(), ServerError> {
    match store.init_schema().await {
        Ok(()) => Ok(()),
        Err(e) if strict => Err(ServerError::Schema(e)),
        Err(e) => {
            tracing::error!(error = %e, "schema initialization failed, continuing in degraded mode");
            Ok(())
        }
    }
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let settings = DbSettings::from_env();
/// let store = PgPersonaStore::new(ConnectionProvider::new(settings.clone()));
/// run_server(Arc::new(store), settings, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    store: Arc<dyn PersonaStore>,
    db_settings: DbSettings,
    config: ServerConfig,
) -> Result<(), ServerError> {
    prepare_schema(store.as_ref(), config.strict_schema).await?;

    let state = Arc::new(AppState::new(store, db_settings));
    let app = build_router(state, &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("schema initialization failed: {0}")]
    Schema(#[source] DbError),
}
