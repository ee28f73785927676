//! Store seam between HTTP handlers and the database
//!
//! Handlers only see `Arc<dyn PersonaStore>`. The PostgreSQL implementation
//! opens one connection per call through [`ConnectionProvider`].

use async_trait::async_trait;
use serde::Serialize;

use super::repos::{PersonaRecord, PersonaRepo};
use super::{schema, ConnectionProvider, DbError};
use crate::config::DbSettings;
use crate::models::{Dni, NewPersona, PersonaUpdate};

/// Result of a store health probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreHealth {
    pub db_version: String,
    /// Whether the `personas` table exists
    pub schema_ready: bool,
}

#[async_trait]
pub trait PersonaStore: Send + Sync + 'static {
    /// Check connectivity and report the server version.
    async fn health(&self) -> Result<StoreHealth, DbError>;

    /// Create the backing table if absent.
    async fn init_schema(&self) -> Result<(), DbError>;

    async fn create(&self, persona: NewPersona) -> Result<PersonaRecord, DbError>;

    /// All personas ordered by ascending id.
    async fn list(&self) -> Result<Vec<PersonaRecord>, DbError>;

    async fn get(&self, dni: &Dni) -> Result<PersonaRecord, DbError>;

    async fn update(&self, dni: &Dni, update: PersonaUpdate) -> Result<PersonaRecord, DbError>;

    async fn delete(&self, dni: &Dni) -> Result<(), DbError>;
}

/// PostgreSQL-backed store, one connection per call
#[derive(Debug, Clone)]
pub struct PgPersonaStore {
    provider: ConnectionProvider,
}

impl PgPersonaStore {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Store configured from the `DB_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(ConnectionProvider::new(DbSettings::from_env()))
    }

    pub fn settings(&self) -> &DbSettings {
        self.provider.settings()
    }
}

#[async_trait]
impl PersonaStore for PgPersonaStore {
    async fn health(&self) -> Result<StoreHealth, DbError> {
        let (db_version, schema_ready) = self
            .provider
            .with_connection(|conn| Box::pin(async move { PersonaRepo::new(conn).probe().await }))
            .await?;
        Ok(StoreHealth {
            db_version,
            schema_ready,
        })
    }

    async fn init_schema(&self) -> Result<(), DbError> {
        self.provider
            .with_connection(|conn| Box::pin(async move { schema::init_schema(conn).await }))
            .await
    }

    async fn create(&self, persona: NewPersona) -> Result<PersonaRecord, DbError> {
        self.provider
            .with_connection(move |conn| {
                Box::pin(async move { PersonaRepo::new(conn).create(&persona).await })
            })
            .await
    }

    async fn list(&self) -> Result<Vec<PersonaRecord>, DbError> {
        self.provider
            .with_connection(|conn| Box::pin(async move { PersonaRepo::new(conn).list().await }))
            .await
    }

    async fn get(&self, dni: &Dni) -> Result<PersonaRecord, DbError> {
        let dni = dni.clone();
        self.provider
            .with_connection(move |conn| {
                Box::pin(async move { PersonaRepo::new(conn).get(&dni).await })
            })
            .await
    }

    async fn update(&self, dni: &Dni, update: PersonaUpdate) -> Result<PersonaRecord, DbError> {
        let dni = dni.clone();
        self.provider
            .with_connection(move |conn| {
                Box::pin(async move { PersonaRepo::new(conn).update(&dni, &update).await })
            })
            .await
    }

    async fn delete(&self, dni: &Dni) -> Result<(), DbError> {
        let dni = dni.clone();
        self.provider
            .with_connection(move |conn| {
                Box::pin(async move { PersonaRepo::new(conn).delete(&dni).await })
            })
            .await
    }
}
