//! Table creation for the personas store

use sqlx::{Connection, PgConnection};

use super::DbError;

const CREATE_PERSONAS: &str = r#"
    CREATE TABLE IF NOT EXISTS personas (
        id SERIAL PRIMARY KEY,
        dni VARCHAR(20) UNIQUE NOT NULL,
        nombre VARCHAR(100) NOT NULL,
        apellido VARCHAR(100) NOT NULL,
        email VARCHAR(255),
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Create the `personas` table if it does not exist.
///
/// Idempotent. Runs in its own transaction: committed on success, rolled
/// back on failure.
pub async fn init_schema(conn: &mut PgConnection) -> Result<(), DbError> {
    tracing::info!("Ensuring personas table exists...");

    let mut tx = conn.begin().await?;
    match sqlx::query(CREATE_PERSONAS).execute(&mut *tx).await {
        Ok(_) => {
            tx.commit().await?;
            tracing::info!("personas table ready");
            Ok(())
        }
        Err(e) => {
            if let Err(rb) = tx.rollback().await {
                tracing::warn!(error = %rb, "rollback after failed table creation also failed");
            }
            Err(e.into())
        }
    }
}
