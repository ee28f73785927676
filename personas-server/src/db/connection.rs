//! Per-call database connections
//!
//! There is no pool: every store call opens one connection, bounded by the
//! configured connect timeout, and closes it before returning.

use std::future::Future;
use std::pin::Pin;

use sqlx::{Connection, PgConnection};

use super::DbError;
use crate::config::DbSettings;

/// Future returned by a [`ConnectionProvider::with_connection`] operation.
pub type ConnFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, DbError>> + Send + 'c>>;

/// Opens connections from explicitly supplied settings
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    settings: DbSettings,
}

impl ConnectionProvider {
    pub fn new(settings: DbSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DbSettings {
        &self.settings
    }

    /// Open a single connection.
    ///
    /// # Errors
    ///
    /// - [`DbError::Config`] if required settings are missing, before any
    ///   network activity
    /// - [`DbError::Timeout`] if the connect timeout elapses
    /// - [`DbError::Connect`] if the server refuses or the TLS handshake fails
    pub async fn connect(&self) -> Result<PgConnection, DbError> {
        let config = self.settings.validate()?;
        let options = config.connect_options();

        match tokio::time::timeout(config.connect_timeout, PgConnection::connect_with(&options))
            .await
        {
            Ok(Ok(conn)) => {
                tracing::debug!(host = %config.host, database = %config.database, "database connection opened");
                Ok(conn)
            }
            Ok(Err(e)) => Err(DbError::Connect(e)),
            Err(_) => Err(DbError::Timeout {
                seconds: config.connect_timeout.as_secs(),
            }),
        }
    }

    /// Run `op` on a fresh connection and close it afterwards.
    ///
    /// The connection is closed whether `op` succeeds or fails. A failed
    /// close is logged and never replaces the result of `op`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let version = provider
    ///     .with_connection(|conn| Box::pin(async move {
    ///         PersonaRepo::new(conn).probe().await
    ///     }))
    ///     .await?;
    /// ```
    pub async fn with_connection<T, F>(&self, op: F) -> Result<T, DbError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> ConnFuture<'c, T> + Send,
    {
        let mut conn = self.connect().await?;
        let result = op(&mut conn).await;

        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "failed to close database connection cleanly");
        } else {
            tracing::debug!("database connection closed");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, DB_HOST};

    #[tokio::test]
    async fn missing_config_fails_before_connecting() {
        let provider = ConnectionProvider::new(DbSettings::default());
        let err = provider.connect().await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Config(ConfigError::Missing { var: DB_HOST })
        ));
    }

    #[tokio::test]
    async fn with_connection_does_not_run_op_without_connection() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let provider = ConnectionProvider::new(DbSettings::default());
        let result: Result<(), DbError> = provider
            .with_connection(move |_conn| {
                Box::pin(async move {
                    flag.store(true, Ordering::SeqCst);
                    Ok(())
                })
            })
            .await;
        assert!(matches!(result, Err(DbError::Config(_))));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn refused_connection_is_connectivity_error() {
        // Port 1 on loopback is closed on any sane test host
        let settings = DbSettings::from_lookup(|key| match key {
            "DB_HOST" => Some("127.0.0.1".into()),
            "DB_NAME" => Some("personas".into()),
            "DB_USER" => Some("personas".into()),
            "DB_PASSWORD" => Some("personas".into()),
            "DB_PORT" => Some("1".into()),
            "DB_SSLMODE" => Some("disable".into()),
            "DB_CONNECT_TIMEOUT_SECS" => Some("2".into()),
            _ => None,
        });
        let err = ConnectionProvider::new(settings).connect().await.unwrap_err();
        assert!(err.is_connectivity(), "unexpected error: {err}");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn opens_and_closes_connection() {
        let provider = ConnectionProvider::new(DbSettings::from_env());
        let one: i32 = provider
            .with_connection(|conn| {
                Box::pin(async move {
                    let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&mut *conn).await?;
                    Ok(row.0)
                })
            })
            .await
            .expect("query failed");
        assert_eq!(one, 1);
    }
}
