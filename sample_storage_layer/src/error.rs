//! Storage factory error handling module
//! Every variant names the construction stage that failed

use thiserror::Error;

/// Storage factory construction error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Configuration file missing, unreadable or malformed
    #[error("Failed to load storage config: {0}")]
    ConfigLoad(String),

    /// `type` is neither mysql nor postgres
    #[error("not support storage type: {0}")]
    UnsupportedBackend(String),

    /// Host, credentials, database name or TLS settings missing or malformed
    #[error("Invalid connection params: {0}")]
    InvalidConnectionParams(String),

    /// Log verbosity or slow threshold malformed
    #[error("Invalid log config: {0}")]
    InvalidLogConfig(String),

    /// Pool limits negative or malformed
    #[error("Invalid connpool config: {0}")]
    InvalidPoolConfig(String),

    /// Backend rejected or could not be reached while opening the pool
    #[error("Failed to connect to database: {0}")]
    ConnectionOpen(String),

    /// Creating the resources table failed
    #[error("Failed to migrate schema: {0}")]
    SchemaMigrationFailed(String),
}

impl From<common_log::LogError> for StorageError {
    fn from(err: common_log::LogError) -> Self {
        match err {
            common_log::LogError::InvalidLogConfig(msg) => StorageError::InvalidLogConfig(msg),
            common_log::LogError::Sink(msg) => StorageError::InvalidLogConfig(msg),
        }
    }
}
