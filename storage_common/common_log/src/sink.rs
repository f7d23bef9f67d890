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

//! Log sinks backed by log4rs appenders

use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::delete::DeleteRoller;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::roll::Roll;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger as SizeBasedTriggerPolicy;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::Append;
use log4rs::encode::pattern::PatternEncoder;

use crate::config::RotationPolicy;
use crate::error::LogError;

/// Line layout shared by every sink: `2025/01/02 15:04:05 message`
pub const LINE_PATTERN: &str = "{d(%Y/%m/%d %H:%M:%S)} {m}{n}";

/// Sink writing to the process standard output
pub fn stdout_sink() -> Box<dyn Append> {
    Box::new(
        ConsoleAppender::builder()
            .target(Target::Stdout)
            .encoder(Box::new(PatternEncoder::new(LINE_PATTERN)))
            .build(),
    )
}

/// Sink writing to a file that rotates according to `policy`
pub fn policy_sink(policy: &RotationPolicy) -> Result<Box<dyn Append>, LogError> {
    let appender = rolling_file_sink(
        policy.file_path(),
        policy.max_size_bytes(),
        policy.max_backups,
        policy.compress,
    )?;
    Ok(Box::new(appender))
}

/// Creates a rolling file appender that rotates once the file grows past `limit_bytes`.
///
/// Backups are named `<path>.1` .. `<path>.<max_backups>` (with a `.gz` suffix when
/// `compress` is set). With `max_backups == 0` the rotated file is deleted.
pub fn rolling_file_sink(
    path: &str,
    limit_bytes: u64,
    max_backups: u32,
    compress: bool,
) -> Result<RollingFileAppender, LogError> {
    let size_trigger = SizeBasedTriggerPolicy::new(limit_bytes);
    let roller: Box<dyn Roll> = if max_backups == 0 {
        Box::new(DeleteRoller::new())
    } else {
        let archived_log_pattern = if compress {
            format!("{}.{{}}.gz", path)
        } else {
            format!("{}.{{}}", path)
        };
        let roller = FixedWindowRoller::builder()
            .base(1)
            .build(&archived_log_pattern, max_backups)
            .map_err(|e| LogError::Sink(e.to_string()))?;
        Box::new(roller)
    };
    let compound_policy = CompoundPolicy::new(Box::new(size_trigger), roller);

    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LINE_PATTERN)))
        .build(path, Box::new(compound_policy))
        .map_err(|e| LogError::Sink(format!("{}: {}", path, e)))
}
