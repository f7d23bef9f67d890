/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

//! Storage Factory Module
//! Builds the pooled database connection handed to the storage interface layer

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use common_log::{build_logger, LogLevel, QueryTrace, SqlLogger};
use log::{error, info};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr};

use crate::config::{Config, PoolSettings, StorageType};
use crate::dialect::resolve;
use crate::pool::apply_pool_config;
use crate::register::STORAGE_NAME;
use crate::schema::ensure_schema;
use crate::StorageError;

/// Construction progress of a storage factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryState {
    Unconfigured,
    Resolved,
    Connected,
    PoolTuned,
    SchemaReady,
    Ready,
}

impl fmt::Display for FactoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

fn fail(state: FactoryState, err: StorageError) -> StorageError {
    error!("Storage factory construction failed after {}: {}", state, err);
    err
}

/// Build the SQL logger from the `log` section; discard logger when absent
///
/// # Errors
///
/// * `StorageError::InvalidLogConfig` - If the level or slow threshold is malformed.
pub fn new_logger(cfg: &Config) -> Result<Arc<dyn SqlLogger>, StorageError> {
    let options = cfg.sql_log_options()?;
    Ok(build_logger(options.as_ref())?)
}

/// Report every statement executed on `db` to `logger`
fn attach_logger(db: &mut DatabaseConnection, logger: &Arc<dyn SqlLogger>) {
    if logger.level() == LogLevel::Silent {
        return;
    }
    let logger = logger.clone();
    db.set_metric_callback(move |info| {
        let sql = info.statement.to_string();
        logger.trace(&QueryTrace {
            elapsed: info.elapsed,
            rows: None,
            error: info.failed.then_some("statement failed"),
            sql: &sql,
        });
    });
}

/// Ready-to-use storage handle
///
/// Owns the pooled connection and the SQL logger for the process lifetime.
pub struct StorageFactory {
    db: DatabaseConnection,
    storage_type: StorageType,
    pool: PoolSettings,
    logger: Arc<dyn SqlLogger>,
}

impl StorageFactory {
    /// Run the whole construction sequence for `cfg`.
    ///
    /// `Unconfigured -> Resolved -> Connected -> PoolTuned -> SchemaReady -> Ready`.
    /// Pool limits are fixed when a sqlx pool is created, so they are applied to the
    /// connect options right before the pool opens. Nothing is retried and no partial
    /// handle is returned.
    ///
    /// # Errors
    ///
    /// * `StorageError::UnsupportedBackend` - If `type` is neither mysql nor postgres.
    /// * `StorageError::InvalidConnectionParams` - If connection fields are missing or malformed.
    /// * `StorageError::InvalidLogConfig` - If the `log` section is malformed.
    /// * `StorageError::InvalidPoolConfig` - If the `connpool` section is malformed.
    /// * `StorageError::ConnectionOpen` - If the backend cannot be reached or rejects the connection.
    /// * `StorageError::SchemaMigrationFailed` - If the resources table cannot be created.
    pub async fn from_config(cfg: &Config) -> Result<Self, StorageError> {
        let mut state = FactoryState::Unconfigured;

        let storage_type = cfg.storage_type().map_err(|e| fail(state, e))?;
        let connector = resolve(cfg).map_err(|e| fail(state, e))?;
        let logger = new_logger(cfg).map_err(|e| fail(state, e))?;
        let mut options = connector.connect_options();
        let pool = apply_pool_config(&mut options, cfg.pool_config()).map_err(|e| fail(state, e))?;
        state = FactoryState::Resolved;
        info!("Storage factory {}: type={}", state, storage_type);

        let mut db = connector.open(options).await.map_err(|e| fail(state, e))?;
        attach_logger(&mut db, &logger);
        state = FactoryState::Connected;
        info!("Storage factory {}: {} connection pool created", state, storage_type);

        state = FactoryState::PoolTuned;
        info!(
            "Storage factory {}: max_idle_conns={}, max_open_conns={}, max_lifetime={:?}",
            state, pool.max_idle_conns, pool.max_open_conns, pool.conn_max_lifetime
        );

        if let Err(e) = ensure_schema(&db).await {
            if let Err(close_err) = db.close().await {
                error!("Failed to close connection pool: {}", close_err);
            }
            return Err(fail(state, e));
        }
        state = FactoryState::SchemaReady;
        info!("Storage factory {}", state);

        let factory = Self { db, storage_type, pool, logger };
        info!("Storage factory {}", FactoryState::Ready);
        Ok(factory)
    }

    /// Live pooled connection
    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.db.get_database_backend()
    }

    /// Pool limits in effect; zero where the backend default applies
    pub fn pool_settings(&self) -> &PoolSettings {
        &self.pool
    }

    pub fn logger(&self) -> Arc<dyn SqlLogger> {
        self.logger.clone()
    }

    /// Close every pooled connection
    pub async fn close(self) -> Result<(), DbErr> {
        let storage_type = self.storage_type;
        self.db.close().await.map_err(|e| {
            error!("Failed to close {} connection pool: {}", storage_type, e);
            e
        })
    }
}

impl fmt::Debug for StorageFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageFactory")
            .field("storage_type", &self.storage_type)
            .field("pool", &self.pool)
            .field("log_level", &self.logger.level())
            .finish()
    }
}

impl storage_registry::StorageFactory for StorageFactory {
    fn storage_name(&self) -> &str {
        STORAGE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Build a storage factory from the configuration document at `config_path`
///
/// # Example
/// ```no_run
/// use sample_storage_layer::new_storage_factory;
///
/// async fn example() {
///     let factory = new_storage_factory("/etc/clusterpedia/storage/config.yaml").await.unwrap();
///     let _db = factory.database();
/// }
/// ```
///
/// # Errors
///
/// * `StorageError::ConfigLoad` - If the path is empty or the document cannot be loaded.
/// * Any error of [`StorageFactory::from_config`].
pub async fn new_storage_factory(config_path: &str) -> Result<StorageFactory, StorageError> {
    let cfg = Config::from_yaml(config_path).map_err(|e| fail(FactoryState::Unconfigured, e))?;
    StorageFactory::from_config(&cfg).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_log::DiscardLogger;
    use sea_orm::MockDatabase;

    fn mock_factory(backend: DatabaseBackend, storage_type: StorageType) -> StorageFactory {
        StorageFactory {
            db: MockDatabase::new(backend).into_connection(),
            storage_type,
            pool: PoolSettings::default(),
            logger: Arc::new(DiscardLogger),
        }
    }

    #[test]
    fn test_backend_follows_connection() {
        assert_eq!(mock_factory(DatabaseBackend::MySql, StorageType::MySql).backend(), DatabaseBackend::MySql);
        assert_eq!(
            mock_factory(DatabaseBackend::Postgres, StorageType::Postgres).backend(),
            DatabaseBackend::Postgres
        );
    }

    #[tokio::test]
    async fn test_close_returns_database_error_type() {
        let factory = mock_factory(DatabaseBackend::Postgres, StorageType::Postgres);
        let result: Result<(), DbErr> = factory.close().await;
        assert!(result.is_ok());
    }
}
