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

//! SQL log adapter
//! Redirects per-statement output of the database layer to stdout or a size-rotating file

pub mod config;
pub mod error;
pub mod logger;
pub mod sink;

use std::sync::Arc;

use log::warn;

pub use config::{LogLevel, RotationPolicy, SqlLogOptions, DEFAULT_LOG_FILE_NAME};
pub use error::LogError;
pub use logger::{DiscardLogger, QueryTrace, SinkLogger, SqlLogger};

/// Build the SQL logger described by `options`
///
/// `None` disables SQL logging and returns a [`DiscardLogger`]. Otherwise the
/// logger writes to stdout when `options.stdout` is set, or to a rolling file
/// described by the custom rotation policy (default policy when absent).
///
/// A file sink that cannot be opened does not fail the call: a warning is logged
/// and the returned logger drops its lines.
///
/// # Errors
///
/// * `LogError::InvalidLogConfig` - If the verbosity level is malformed.
///
/// # Example
/// ```
/// use common_log::SqlLogger;
///
/// let logger = common_log::build_logger(None).unwrap();
/// assert_eq!(logger.level(), common_log::LogLevel::Silent);
/// ```
pub fn build_logger(options: Option<&SqlLogOptions>) -> Result<Arc<dyn SqlLogger>, LogError> {
    let options = match options {
        Some(options) => options,
        None => return Ok(Arc::new(DiscardLogger)),
    };
    let level: LogLevel = options.level.parse()?;

    if options.stdout {
        return Ok(Arc::new(SinkLogger::new(sink::stdout_sink(), level, options.slow_threshold)));
    }

    let policy = options.effective_rotation();
    match sink::policy_sink(&policy) {
        Ok(sink) => Ok(Arc::new(SinkLogger::new(sink, level, options.slow_threshold))),
        Err(e) => {
            warn!("SQL log file {} unavailable, SQL log lines will be dropped: {}", policy.file_path(), e);
            Ok(Arc::new(SinkLogger::unavailable(level, options.slow_threshold)))
        }
    }
}
