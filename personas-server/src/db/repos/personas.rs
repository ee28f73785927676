//! Persona repository
//!
//! Every method executes exactly one parameterized statement on the
//! borrowed connection. Mutations run inside a transaction that is
//! committed on success and rolled back on any error, including
//! "no row matched".

use sqlx::{Connection, FromRow, PgConnection, Postgres, Transaction};

use crate::db::DbError;
use crate::models::{Dni, Email, NewPersona, PersonaUpdate};

/// Persona row as stored. `created_at` is never selected.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PersonaRecord {
    pub id: i32,
    pub dni: String,
    pub nombre: String,
    pub apellido: String,
    pub email: Option<String>,
}

/// Persona repository
pub struct PersonaRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PersonaRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Server version string and whether the `personas` table exists.
    pub async fn probe(&mut self) -> Result<(String, bool), DbError> {
        let row: (String, bool) =
            sqlx::query_as("SELECT version(), to_regclass('personas') IS NOT NULL")
                .fetch_one(&mut *self.conn)
                .await?;
        Ok(row)
    }

    /// Insert a persona. The store assigns `id`.
    ///
    /// A duplicate `dni` is reported as [`DbError::Duplicate`] and leaves
    /// the existing row untouched.
    pub async fn create(&mut self, persona: &NewPersona) -> Result<PersonaRecord, DbError> {
        let mut tx = self.conn.begin().await?;

        let inserted = sqlx::query_as::<_, PersonaRecord>(
            r#"
            INSERT INTO personas (dni, nombre, apellido, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, dni, nombre, apellido, email
            "#,
        )
        .bind(persona.dni.as_str())
        .bind(persona.nombre.as_str())
        .bind(persona.apellido.as_str())
        .bind(persona.email.as_ref().map(Email::as_str))
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(record) => {
                tx.commit().await?;
                Ok(record)
            }
            Err(e) => {
                rollback(tx).await;
                Err(DbError::from_insert(e, persona.dni.as_str()))
            }
        }
    }

    /// All personas, ascending by `id` (insertion order).
    pub async fn list(&mut self) -> Result<Vec<PersonaRecord>, DbError> {
        let rows = sqlx::query_as::<_, PersonaRecord>(
            "SELECT id, dni, nombre, apellido, email FROM personas ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows)
    }

    /// Look up one persona by national ID.
    pub async fn get(&mut self, dni: &Dni) -> Result<PersonaRecord, DbError> {
        sqlx::query_as::<_, PersonaRecord>(
            "SELECT id, dni, nombre, apellido, email FROM personas WHERE dni = $1",
        )
        .bind(dni.as_str())
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| not_found(dni))
    }

    /// Replace name, last name and email. `id` and `dni` never change.
    pub async fn update(
        &mut self,
        dni: &Dni,
        update: &PersonaUpdate,
    ) -> Result<PersonaRecord, DbError> {
        let mut tx = self.conn.begin().await?;

        let updated = sqlx::query_as::<_, PersonaRecord>(
            r#"
            UPDATE personas
            SET nombre = $1, apellido = $2, email = $3
            WHERE dni = $4
            RETURNING id, dni, nombre, apellido, email
            "#,
        )
        .bind(update.nombre.as_str())
        .bind(update.apellido.as_str())
        .bind(update.email.as_ref().map(Email::as_str))
        .bind(dni.as_str())
        .fetch_optional(&mut *tx)
        .await;

        match updated {
            Ok(Some(record)) => {
                tx.commit().await?;
                Ok(record)
            }
            Ok(None) => {
                rollback(tx).await;
                Err(not_found(dni))
            }
            Err(e) => {
                rollback(tx).await;
                Err(e.into())
            }
        }
    }

    /// Remove a persona for good.
    pub async fn delete(&mut self, dni: &Dni) -> Result<(), DbError> {
        let mut tx = self.conn.begin().await?;

        let deleted = sqlx::query("DELETE FROM personas WHERE dni = $1")
            .bind(dni.as_str())
            .execute(&mut *tx)
            .await;

        match deleted {
            Ok(result) if result.rows_affected() > 0 => {
                tx.commit().await?;
                Ok(())
            }
            Ok(_) => {
                rollback(tx).await;
                Err(not_found(dni))
            }
            Err(e) => {
                rollback(tx).await;
                Err(e.into())
            }
        }
    }
}

fn not_found(dni: &Dni) -> DbError {
    DbError::NotFound {
        resource: "persona",
        id: dni.as_str().to_owned(),
    }
}

async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "transaction rollback failed");
    }
}
