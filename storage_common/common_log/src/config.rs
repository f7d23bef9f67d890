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

use std::str::FromStr;
use std::time::Duration;

use crate::error::LogError;

/// Default SQL log file used when no rotation policy names one
pub const DEFAULT_LOG_FILE_NAME: &str = "/var/log/clusterpedia/sample-storage-layer.log";
/// Default size cap of a single log file, in megabytes
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;
/// Default number of rotated backups kept next to the active file
pub const DEFAULT_MAX_BACKUPS: u32 = 1;
/// Default slow statement threshold
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(200);

/// Verbosity of the SQL logger, ordered from quietest to loudest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Silent,
    Error,
    #[default]
    Warn,
    Info,
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "warn" | "warning" => Ok(LogLevel::Warn),
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "info" => Ok(LogLevel::Info),
            other => Err(LogError::InvalidLogConfig(format!("unknown log level: {}", other))),
        }
    }
}

/// Size based rotation policy of the SQL log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Active log file; empty means [`DEFAULT_LOG_FILE_NAME`]
    pub path: String,
    /// Size cap in megabytes; zero means [`DEFAULT_MAX_SIZE_MB`]
    pub max_size: u64,
    /// Rotated files kept; zero keeps none
    pub max_backups: u32,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            path: DEFAULT_LOG_FILE_NAME.to_string(),
            max_size: DEFAULT_MAX_SIZE_MB,
            max_backups: DEFAULT_MAX_BACKUPS,
            compress: false,
        }
    }
}

impl RotationPolicy {
    pub fn file_path(&self) -> &str {
        if self.path.trim().is_empty() {
            DEFAULT_LOG_FILE_NAME
        } else {
            &self.path
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        let megabytes = if self.max_size == 0 { DEFAULT_MAX_SIZE_MB } else { self.max_size };
        megabytes.saturating_mul(1024 * 1024)
    }
}

/// Options of the SQL logger attached to a database connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlLogOptions {
    /// Write to standard output instead of a file
    pub stdout: bool,
    /// Verbosity, parsed with [`LogLevel::from_str`]
    pub level: String,
    /// Statements slower than this are reported at warn level; zero disables
    pub slow_threshold: Duration,
    /// Custom rotation policy; `None` uses [`RotationPolicy::default`]
    pub rotation: Option<RotationPolicy>,
}

impl Default for SqlLogOptions {
    fn default() -> Self {
        Self {
            stdout: false,
            level: "warn".to_string(),
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
            rotation: None,
        }
    }
}

impl SqlLogOptions {
    /// Returns the rotation policy in effect, filling the default file name in
    pub fn effective_rotation(&self) -> RotationPolicy {
        match &self.rotation {
            Some(policy) => {
                let mut policy = policy.clone();
                if policy.path.trim().is_empty() {
                    policy.path = DEFAULT_LOG_FILE_NAME.to_string();
                }
                policy
            }
            None => RotationPolicy::default(),
        }
    }
}
