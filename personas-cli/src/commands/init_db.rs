//! One-shot table creation

use anyhow::{Context, Result};

use personas_server::{PersonaStore, PgPersonaStore};

/// Create the personas table and exit
pub async fn run_init_db() -> Result<()> {
    let store = PgPersonaStore::from_env();
    store
        .init_schema()
        .await
        .context("Failed to create personas table")?;

    tracing::info!("personas table ready");
    Ok(())
}
