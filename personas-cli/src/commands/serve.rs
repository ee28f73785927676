//! HTTP server command for the personas API
//!
//! Runs the personas HTTP service until Ctrl+C / SIGTERM.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::Parser;

use personas_server::{run_server, ConnectionProvider, DbSettings, PgPersonaStore, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long, env = "CORS_PERMISSIVE", value_parser = BoolishValueParser::new())]
    pub cors_permissive: bool,

    /// Expose /debug/env (never in production)
    #[arg(long, env = "ENABLE_DEBUG_ENDPOINTS", value_parser = BoolishValueParser::new())]
    pub debug_endpoints: bool,

    /// Refuse to start if the personas table cannot be created
    #[arg(long, env = "STRICT_SCHEMA", value_parser = BoolishValueParser::new())]
    pub strict_schema: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let bind_addr = SocketAddr::new(args.host, args.port);
    tracing::info!("Starting personas server on {}", bind_addr);

    let settings = DbSettings::from_env();
    if let Err(e) = settings.validate() {
        // Not fatal: requests will answer 500 until the environment is fixed
        tracing::warn!(error = %e, "database configuration incomplete");
    }
    let store = PgPersonaStore::new(ConnectionProvider::new(settings.clone()));

    // Configure server
    let config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive,
        debug_endpoints: args.debug_endpoints,
        strict_schema: args.strict_schema,
    };

    // Run server (blocks until shutdown)
    run_server(Arc::new(store), settings, config)
        .await
        .context("Server error")?;

    Ok(())
}
