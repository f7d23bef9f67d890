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

//! Storage Configuration Module
//! Typed view of the storage layer configuration document

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use common_log::{RotationPolicy, SqlLogOptions};
use log::info;
use serde::Deserialize;

use crate::StorageError;

/// Supported relational backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    MySql,
    Postgres,
}

impl StorageType {
    pub fn default_port(&self) -> u16 {
        match self {
            StorageType::MySql => 3306,
            StorageType::Postgres => 5432,
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::MySql => write!(f, "mysql"),
            StorageType::Postgres => write!(f, "postgres"),
        }
    }
}

/// Duration written either as bare seconds or as `1h30m`, `500ms`, ...
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(i64),
    Text(String),
}

impl DurationValue {
    pub fn to_duration(&self) -> Result<Duration, String> {
        match self {
            DurationValue::Seconds(secs) if *secs < 0 => Err(format!("negative duration: {}", secs)),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs as u64)),
            DurationValue::Text(text) => parse_duration(text),
        }
    }
}

/// Parse a duration such as `1h`, `1h30m`, `250ms`, `2days` or `90` (seconds).
///
/// Anything but a bare integer goes through `humantime`; fractions and negative
/// values are rejected.
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = text.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(text).map_err(|e| format!("invalid duration {}: {}", text, e))
}

/// Connection pool limits as written in the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_idle_conns: i64,
    pub max_open_conns: i64,
    pub max_lifetime: Option<DurationValue>,
}

/// Validated connection pool limits; zero means backend default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_idle_conns: u32,
    pub max_open_conns: u32,
    pub conn_max_lifetime: Duration,
}

impl PoolConfig {
    /// Validates the limits.
    ///
    /// `max_idle_conns > max_open_conns` is accepted here; the pool clamps it.
    ///
    /// # Errors
    ///
    /// * `StorageError::InvalidPoolConfig` - If a limit is negative or the lifetime is malformed.
    pub fn resolve(&self) -> Result<PoolSettings, StorageError> {
        let max_idle_conns = u32::try_from(self.max_idle_conns)
            .map_err(|_| StorageError::InvalidPoolConfig(format!("max_idle_conns: {}", self.max_idle_conns)))?;
        let max_open_conns = u32::try_from(self.max_open_conns)
            .map_err(|_| StorageError::InvalidPoolConfig(format!("max_open_conns: {}", self.max_open_conns)))?;
        let conn_max_lifetime = match &self.max_lifetime {
            Some(value) => value
                .to_duration()
                .map_err(|e| StorageError::InvalidPoolConfig(format!("max_lifetime: {}", e)))?,
            None => Duration::ZERO,
        };
        Ok(PoolSettings { max_idle_conns, max_open_conns, conn_max_lifetime })
    }
}

/// Custom rotation policy of the SQL log file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogFileConfig {
    pub path: String,
    /// Megabytes
    pub max_size: u64,
    pub max_backups: u32,
    pub compress: bool,
}

/// SQL log settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub stdout: bool,
    pub level: String,
    pub slow_threshold: Option<DurationValue>,
    pub file: Option<LogFileConfig>,
}

/// Storage layer configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "mysql" or "postgres"
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Full connection URL, takes precedence over the discrete fields
    pub dsn: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: Option<String>,
    pub ssl_root_cert: Option<String>,
    pub connect_timeout: Option<DurationValue>,
    /// Extra connection parameters appended to the URL query
    pub params: BTreeMap<String, String>,
    pub connpool: PoolConfig,
    /// Absent disables SQL logging
    pub log: Option<LogConfig>,
}

impl Config {
    /// Loads the configuration document at `path` (YAML, or JSON).
    ///
    /// # Errors
    ///
    /// * `StorageError::ConfigLoad` - If the path is empty, unreadable or the document is malformed.
    pub fn from_yaml(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(StorageError::ConfigLoad("configPath should not be empty".to_string()));
        }
        info!("load storage config from {}", path.display());
        let config_str = std::fs::read_to_string(&path)
            .map_err(|e| StorageError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&config_str)
            .map_err(|e| StorageError::ConfigLoad(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, StorageError> {
        serde_yaml::from_str(content).map_err(|e| StorageError::ConfigLoad(e.to_string()))
    }

    /// # Errors
    ///
    /// * `StorageError::UnsupportedBackend` - If `type` is neither mysql nor postgres.
    pub fn storage_type(&self) -> Result<StorageType, StorageError> {
        match self.storage_type.trim().to_lowercase().as_str() {
            "mysql" => Ok(StorageType::MySql),
            "postgres" => Ok(StorageType::Postgres),
            _ => Err(StorageError::UnsupportedBackend(self.storage_type.clone())),
        }
    }

    pub fn pool_config(&self) -> &PoolConfig {
        &self.connpool
    }

    /// # Errors
    ///
    /// * `StorageError::InvalidConnectionParams` - If `connect_timeout` is malformed.
    pub fn connect_timeout(&self) -> Result<Option<Duration>, StorageError> {
        self.connect_timeout
            .as_ref()
            .map(|value| {
                value
                    .to_duration()
                    .map_err(|e| StorageError::InvalidConnectionParams(format!("connect_timeout: {}", e)))
            })
            .transpose()
    }

    /// SQL logger options, `None` when the `log` section is absent.
    ///
    /// # Errors
    ///
    /// * `StorageError::InvalidLogConfig` - If `slow_threshold` is malformed.
    pub fn sql_log_options(&self) -> Result<Option<SqlLogOptions>, StorageError> {
        let log = match &self.log {
            Some(log) => log,
            None => return Ok(None),
        };
        let mut options = SqlLogOptions { stdout: log.stdout, level: log.level.clone(), ..Default::default() };
        if let Some(threshold) = &log.slow_threshold {
            options.slow_threshold = threshold
                .to_duration()
                .map_err(|e| StorageError::InvalidLogConfig(format!("slow_threshold: {}", e)))?;
        }
        options.rotation = log.file.as_ref().map(|file| RotationPolicy {
            path: file.path.clone(),
            max_size: file.max_size,
            max_backups: file.max_backups,
            compress: file.compress,
        });
        Ok(Some(options))
    }
}
