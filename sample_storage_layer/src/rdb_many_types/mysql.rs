//! MySQL dialect
//! Translates the configuration into a MySQL connection URL

use std::fmt;
use std::time::Duration;

use log::info;
use sea_orm::DatabaseBackend;
use url::Url;

use crate::config::{Config, StorageType};
use crate::dialect::{build_url, parse_dsn, DialectConnector};
use crate::StorageError;

/// MySQL connector
pub struct MySqlConnector {
    url: Url,
    connect_timeout: Option<Duration>,
}

impl MySqlConnector {
    /// Build the connector from the discrete fields, or from `dsn` when present.
    ///
    /// # Errors
    ///
    /// * `StorageError::InvalidConnectionParams` - If host, user or database is missing,
    ///   or the ssl mode is not recognised.
    pub fn from_config(cfg: &Config) -> Result<Self, StorageError> {
        let connect_timeout = cfg.connect_timeout()?;
        let url = match cfg.dsn.as_deref().filter(|dsn| !dsn.trim().is_empty()) {
            Some(dsn) => parse_dsn(dsn, &["mysql"])?,
            None => {
                let mut query = Vec::new();
                if let Some(mode) = &cfg.ssl_mode {
                    query.push(("ssl-mode", ssl_mode(mode)?.to_string()));
                }
                if let Some(ca) = &cfg.ssl_root_cert {
                    query.push(("ssl-ca", ca.clone()));
                }
                build_url("mysql", cfg, StorageType::MySql.default_port(), &query)?
            }
        };
        info!(
            "MySQL connection parameters configured: host={}, port={}",
            url.host_str().unwrap_or_default(),
            url.port().unwrap_or(StorageType::MySql.default_port())
        );
        Ok(Self { url, connect_timeout })
    }
}

/// Normalise a MySQL ssl mode; also accepts the `tls` values of the go driver
fn ssl_mode(mode: &str) -> Result<&'static str, StorageError> {
    match mode.trim().to_lowercase().as_str() {
        "disabled" | "disable" | "false" => Ok("DISABLED"),
        "preferred" | "prefer" => Ok("PREFERRED"),
        "required" | "require" | "skip-verify" => Ok("REQUIRED"),
        "verify_ca" | "verify-ca" => Ok("VERIFY_CA"),
        "verify_identity" | "verify-identity" | "verify-full" | "true" => Ok("VERIFY_IDENTITY"),
        other => Err(StorageError::InvalidConnectionParams(format!("unknown mysql ssl_mode: {}", other))),
    }
}

impl DialectConnector for MySqlConnector {
    fn storage_type(&self) -> StorageType {
        StorageType::MySql
    }

    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::MySql
    }

    fn url(&self) -> &Url {
        &self.url
    }

    fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }
}

impl fmt::Debug for MySqlConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlConnector")
            .field("host", &self.url.host_str())
            .field("port", &self.url.port())
            .field("database", &self.url.path())
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
