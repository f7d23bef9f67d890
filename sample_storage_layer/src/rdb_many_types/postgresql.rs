//! PostgreSQL dialect
//! Translates the configuration into a PostgreSQL connection URL

use std::fmt;
use std::time::Duration;

use log::info;
use sea_orm::DatabaseBackend;
use url::Url;

use crate::config::{Config, StorageType};
use crate::dialect::{build_url, parse_dsn, DialectConnector};
use crate::StorageError;

/// PostgreSQL connector
pub struct PostgresConnector {
    url: Url,
    connect_timeout: Option<Duration>,
}

impl PostgresConnector {
    /// Build the connector from the discrete fields, or from `dsn` when present.
    ///
    /// # Errors
    ///
    /// * `StorageError::InvalidConnectionParams` - If host, user or database is missing,
    ///   or the sslmode is not recognised.
    pub fn from_config(cfg: &Config) -> Result<Self, StorageError> {
        let connect_timeout = cfg.connect_timeout()?;
        let url = match cfg.dsn.as_deref().filter(|dsn| !dsn.trim().is_empty()) {
            Some(dsn) => parse_dsn(dsn, &["postgres", "postgresql"])?,
            None => {
                let mut query = Vec::new();
                if let Some(mode) = &cfg.ssl_mode {
                    query.push(("sslmode", ssl_mode(mode)?.to_string()));
                }
                if let Some(ca) = &cfg.ssl_root_cert {
                    query.push(("sslrootcert", ca.clone()));
                }
                build_url("postgres", cfg, StorageType::Postgres.default_port(), &query)?
            }
        };
        info!(
            "PostgreSQL connection parameters configured: host={}, port={}",
            url.host_str().unwrap_or_default(),
            url.port().unwrap_or(StorageType::Postgres.default_port())
        );
        Ok(Self { url, connect_timeout })
    }
}

fn ssl_mode(mode: &str) -> Result<&'static str, StorageError> {
    match mode.trim().to_lowercase().as_str() {
        "disable" | "disabled" => Ok("disable"),
        "allow" => Ok("allow"),
        "prefer" | "preferred" => Ok("prefer"),
        "require" | "required" => Ok("require"),
        "verify-ca" | "verify_ca" => Ok("verify-ca"),
        "verify-full" | "verify_full" | "verify_identity" => Ok("verify-full"),
        other => Err(StorageError::InvalidConnectionParams(format!("unknown postgres sslmode: {}", other))),
    }
}

impl DialectConnector for PostgresConnector {
    fn storage_type(&self) -> StorageType {
        StorageType::Postgres
    }

    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Postgres
    }

    fn url(&self) -> &Url {
        &self.url
    }

    fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }
}

impl fmt::Debug for PostgresConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnector")
            .field("host", &self.url.host_str())
            .field("port", &self.url.port())
            .field("database", &self.url.path())
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
