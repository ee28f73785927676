//! In-memory store for handler tests
//!
//! Mirrors the observable rules of the `personas` table: serial ids from 1
//! that are never reused, a unique `dni`, listing by ascending id.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{DbError, PersonaRecord, PersonaStore, StoreHealth};
use crate::models::{Dni, Email, NewPersona, PersonaUpdate};

#[derive(Default)]
struct Inner {
    rows: Vec<PersonaRecord>,
    next_id: i32,
    schema_ready: bool,
}

pub(crate) struct MemoryPersonaStore {
    inner: Mutex<Inner>,
}

impl MemoryPersonaStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                schema_ready: true,
                ..Default::default()
            }),
        }
    }

    /// A store whose table has not been created yet.
    pub(crate) fn without_schema() -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().schema_ready = false;
        store
    }
}

fn not_found(dni: &Dni) -> DbError {
    DbError::NotFound {
        resource: "persona",
        id: dni.as_str().to_owned(),
    }
}

#[async_trait]
impl PersonaStore for MemoryPersonaStore {
    async fn health(&self) -> Result<StoreHealth, DbError> {
        Ok(StoreHealth {
            db_version: "PostgreSQL 16.0 (in-memory)".to_string(),
            schema_ready: self.inner.lock().unwrap().schema_ready,
        })
    }

    async fn init_schema(&self) -> Result<(), DbError> {
        self.inner.lock().unwrap().schema_ready = true;
        Ok(())
    }

    async fn create(&self, persona: NewPersona) -> Result<PersonaRecord, DbError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.rows.iter().any(|p| p.dni == persona.dni.as_str()) {
            return Err(DbError::Duplicate {
                dni: persona.dni.as_str().to_owned(),
            });
        }
        let record = PersonaRecord {
            id: inner.next_id,
            dni: persona.dni.as_str().to_owned(),
            nombre: persona.nombre.as_str().to_owned(),
            apellido: persona.apellido.as_str().to_owned(),
            email: persona.email.as_ref().map(|e| e.as_str().to_owned()),
        };
        inner.next_id += 1;
        inner.rows.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<PersonaRecord>, DbError> {
        let mut rows = self.inner.lock().unwrap().rows.clone();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    async fn get(&self, dni: &Dni) -> Result<PersonaRecord, DbError> {
        self.inner
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|p| p.dni == dni.as_str())
            .cloned()
            .ok_or_else(|| not_found(dni))
    }

    async fn update(&self, dni: &Dni, update: PersonaUpdate) -> Result<PersonaRecord, DbError> {
        let mut inner = self.inner.lock().unwrap();
        let row = inner
            .rows
            .iter_mut()
            .find(|p| p.dni == dni.as_str())
            .ok_or_else(|| not_found(dni))?;
        row.nombre = update.nombre.as_str().to_owned();
        row.apellido = update.apellido.as_str().to_owned();
        row.email = update.email.as_ref().map(Email::as_str).map(str::to_owned);
        Ok(row.clone())
    }

    async fn delete(&self, dni: &Dni) -> Result<(), DbError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.rows.len();
        inner.rows.retain(|p| p.dni != dni.as_str());
        if inner.rows.len() == before {
            return Err(not_found(dni));
        }
        Ok(())
    }
}
