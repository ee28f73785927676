//! Store configuration read from the process environment
//!
//! Variables are captured once into [`DbSettings`] and validated on every
//! connection attempt. A missing variable therefore surfaces as a request
//! error instead of taking the process down.

use std::fmt;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

pub const DB_HOST: &str = "DB_HOST";
pub const DB_NAME: &str = "DB_NAME";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_SSLMODE: &str = "DB_SSLMODE";
pub const DB_CONNECT_TIMEOUT_SECS: &str = "DB_CONNECT_TIMEOUT_SECS";

const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const APPLICATION_NAME: &str = "personas-server";
const REDACTED: &str = "***";

/// Configuration error, raised before any connection attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Raw connection settings as found in the environment.
///
/// Nothing is checked here; see [`DbSettings::validate`].
#[derive(Clone, Default)]
pub struct DbSettings {
    host: Option<String>,
    database: Option<String>,
    user: Option<String>,
    password: Option<String>,
    port: Option<String>,
    ssl_mode: Option<String>,
    connect_timeout: Option<String>,
}

impl DbSettings {
    /// Snapshot the `DB_*` variables of the current process.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary lookup function.
    ///
    /// # Example
    ///
    /// ```
    /// use personas_server::config::DbSettings;
    ///
    /// let settings = DbSettings::from_lookup(|key| match key {
    ///     "DB_HOST" => Some("localhost".to_string()),
    ///     _ => None,
    /// });
    /// assert!(settings.validate().is_err());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup(DB_HOST),
            database: lookup(DB_NAME),
            user: lookup(DB_USER),
            password: lookup(DB_PASSWORD),
            port: lookup(DB_PORT),
            ssl_mode: lookup(DB_SSLMODE),
            connect_timeout: lookup(DB_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Check required fields and parse the optional ones.
    pub fn validate(&self) -> Result<DbConfig, ConfigError> {
        let host = required(DB_HOST, &self.host)?;
        let database = required(DB_NAME, &self.database)?;
        let user = required(DB_USER, &self.user)?;
        let password = required_secret(DB_PASSWORD, &self.password)?;

        let port = match present(&self.port) {
            None => DEFAULT_DB_PORT,
            Some(raw) => raw.parse::<u16>().map_err(|_| invalid(DB_PORT, raw))?,
        };

        let ssl_mode = match present(&self.ssl_mode) {
            None => PgSslMode::Require,
            Some(raw) => raw.parse::<PgSslMode>().map_err(|_| invalid(DB_SSLMODE, raw))?,
        };

        let connect_timeout = match present(&self.connect_timeout) {
            None => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(invalid(DB_CONNECT_TIMEOUT_SECS, raw)),
            },
        };

        Ok(DbConfig {
            host,
            port,
            database,
            user,
            password,
            ssl_mode,
            connect_timeout,
        })
    }

    /// Variable names with their values, password masked.
    pub fn redacted(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            (DB_HOST, self.host.clone()),
            (DB_NAME, self.database.clone()),
            (DB_USER, self.user.clone()),
            (DB_PASSWORD, self.password.as_ref().map(|_| REDACTED.to_string())),
            (DB_PORT, self.port.clone()),
            (DB_SSLMODE, self.ssl_mode.clone()),
            (DB_CONNECT_TIMEOUT_SECS, self.connect_timeout.clone()),
        ]
    }
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("DbSettings");
        for (name, value) in self.redacted() {
            s.field(name, &value);
        }
        s.finish()
    }
}

/// Validated connection parameters
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    password: String,
    pub ssl_mode: PgSslMode,
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// sqlx connect options for a single connection.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(self.ssl_mode)
            .application_name(APPLICATION_NAME)
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("ssl_mode", &self.ssl_mode)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(var: &'static str, value: &Option<String>) -> Result<String, ConfigError> {
    present(value)
        .map(str::to_owned)
        .ok_or(ConfigError::Missing { var })
}

/// Like [`required`] but kept verbatim: spaces can be part of a password.
fn required_secret(var: &'static str, value: &Option<String>) -> Result<String, ConfigError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or(ConfigError::Missing { var })
}

fn invalid(var: &'static str, raw: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: raw.to_owned(),
    }
}
