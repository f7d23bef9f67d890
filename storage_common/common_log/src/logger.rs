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

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::{Level, Record};
use log4rs::append::Append;

use crate::config::LogLevel;

const SQL_TARGET: &str = "sql";

/// One executed statement as reported by the database layer
#[derive(Debug, Clone, Copy)]
pub struct QueryTrace<'a> {
    pub elapsed: Duration,
    /// Affected or returned rows, when the caller knows them
    pub rows: Option<u64>,
    /// Failure description; sea-orm metric callbacks only flag failure, so
    /// statements traced from a connection carry a fixed marker, not driver text
    pub error: Option<&'a str>,
    pub sql: &'a str,
}

impl fmt::Display for QueryTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.elapsed.as_secs_f64() * 1000.0;
        match self.rows {
            Some(rows) => write!(f, "[{:.3}ms] [rows:{}] {}", millis, rows, self.sql),
            None => write!(f, "[{:.3}ms] [rows:-] {}", millis, self.sql),
        }
    }
}

/// Logger invoked by the database layer, possibly from many queries at once
pub trait SqlLogger: Send + Sync {
    fn level(&self) -> LogLevel;

    fn info(&self, msg: &str);

    fn warn(&self, msg: &str);

    fn error(&self, msg: &str);

    /// Called once per executed statement
    fn trace(&self, trace: &QueryTrace<'_>);
}

/// Logger that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardLogger;

impl SqlLogger for DiscardLogger {
    fn level(&self) -> LogLevel {
        LogLevel::Silent
    }

    fn info(&self, _msg: &str) {}

    fn warn(&self, _msg: &str) {}

    fn error(&self, _msg: &str) {}

    fn trace(&self, _trace: &QueryTrace<'_>) {}
}

/// Logger writing formatted lines into a log4rs appender.
///
/// A sink that fails to accept a line never surfaces the failure; the line is
/// counted in [`SinkLogger::dropped`] instead.
pub struct SinkLogger {
    sink: Option<Box<dyn Append>>,
    level: LogLevel,
    slow_threshold: Duration,
    dropped: AtomicU64,
}

impl SinkLogger {
    pub fn new(sink: Box<dyn Append>, level: LogLevel, slow_threshold: Duration) -> Self {
        Self { sink: Some(sink), level, slow_threshold, dropped: AtomicU64::new(0) }
    }

    /// Logger whose sink could not be opened; every emitted line is dropped
    pub fn unavailable(level: LogLevel, slow_threshold: Duration) -> Self {
        Self { sink: None, level, slow_threshold, dropped: AtomicU64::new(0) }
    }

    pub fn slow_threshold(&self) -> Duration {
        self.slow_threshold
    }

    /// Number of lines the sink failed to write
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn emit(&self, level: Level, line: &str) {
        let sink = match &self.sink {
            Some(sink) => sink,
            None => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        let result = sink.append(
            &Record::builder()
                .args(format_args!("{}", line))
                .level(level)
                .target(SQL_TARGET)
                .build(),
        );
        if result.is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl fmt::Debug for SinkLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkLogger")
            .field("level", &self.level)
            .field("slow_threshold", &self.slow_threshold)
            .field("dropped", &self.dropped())
            .finish()
    }
}

impl SqlLogger for SinkLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn info(&self, msg: &str) {
        if self.level >= LogLevel::Info {
            self.emit(Level::Info, msg);
        }
    }

    fn warn(&self, msg: &str) {
        if self.level >= LogLevel::Warn {
            self.emit(Level::Warn, msg);
        }
    }

    fn error(&self, msg: &str) {
        if self.level >= LogLevel::Error {
            self.emit(Level::Error, msg);
        }
    }

    fn trace(&self, trace: &QueryTrace<'_>) {
        if self.level == LogLevel::Silent {
            return;
        }
        let is_slow = !self.slow_threshold.is_zero() && trace.elapsed > self.slow_threshold;
        match trace.error {
            Some(err) if self.level >= LogLevel::Error => {
                self.emit(Level::Error, &format!("{}\n{}", err, trace));
            }
            _ if is_slow && self.level >= LogLevel::Warn => {
                self.emit(Level::Warn, &format!("SLOW SQL >= {:?}\n{}", self.slow_threshold, trace));
            }
            _ if self.level == LogLevel::Info => {
                self.emit(Level::Info, &trace.to_string());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct MemorySink {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl Append for MemorySink {
        fn append(&self, record: &Record) -> anyhow::Result<()> {
            self.lines.lock().unwrap().push(record.args().to_string());
            Ok(())
        }

        fn flush(&self) {}
    }

    #[derive(Debug)]
    struct BrokenSink;

    impl Append for BrokenSink {
        fn append(&self, _record: &Record) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }

        fn flush(&self) {}
    }

    fn memory_logger(level: LogLevel, slow: Duration) -> (SinkLogger, Arc<Mutex<Vec<String>>>) {
        let sink = MemorySink::default();
        let lines = sink.lines.clone();
        (SinkLogger::new(Box::new(sink), level, slow), lines)
    }

    fn trace<'a>(millis: u64, error: Option<&'a str>) -> QueryTrace<'a> {
        QueryTrace { elapsed: Duration::from_millis(millis), rows: Some(1), error, sql: "SELECT 1" }
    }

    #[test]
    fn test_trace_format() {
        let trace = QueryTrace { elapsed: Duration::from_micros(1500), rows: None, error: None, sql: "SELECT 1" };
        assert_eq!(trace.to_string(), "[1.500ms] [rows:-] SELECT 1");
        let trace = QueryTrace { rows: Some(3), ..trace };
        assert_eq!(trace.to_string(), "[1.500ms] [rows:3] SELECT 1");
    }

    #[test]
    fn test_info_level_logs_every_statement() {
        let (logger, lines) = memory_logger(LogLevel::Info, Duration::from_millis(200));
        logger.trace(&trace(1, None));
        logger.trace(&trace(500, None));
        logger.trace(&trace(1, Some("duplicate key")));
        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("SELECT 1"));
        assert!(lines[1].starts_with("SLOW SQL >= 200ms"));
        assert!(lines[2].starts_with("duplicate key\n"));
    }

    #[test]
    fn test_warn_level_logs_slow_and_failed_statements() {
        let (logger, lines) = memory_logger(LogLevel::Warn, Duration::from_millis(200));
        logger.trace(&trace(1, None));
        logger.trace(&trace(200, None));
        logger.trace(&trace(201, None));
        logger.trace(&trace(1, Some("syntax error")));
        logger.info("connected");
        logger.warn("pool exhausted");
        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("SLOW SQL"));
        assert!(lines[1].starts_with("syntax error"));
        assert_eq!(lines[2], "pool exhausted");
    }

    #[test]
    fn test_zero_threshold_disables_slow_log() {
        let (logger, lines) = memory_logger(LogLevel::Warn, Duration::ZERO);
        logger.trace(&trace(10_000, None));
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_error_and_silent_levels() {
        let (logger, lines) = memory_logger(LogLevel::Error, Duration::from_millis(1));
        logger.trace(&trace(100, None));
        logger.trace(&trace(1, Some("boom")));
        logger.warn("ignored");
        assert_eq!(lines.lock().unwrap().len(), 1);

        let (logger, lines) = memory_logger(LogLevel::Silent, Duration::from_millis(1));
        logger.trace(&trace(100, Some("boom")));
        logger.error("ignored");
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_sink_failure_is_counted() {
        let logger = SinkLogger::new(Box::new(BrokenSink), LogLevel::Info, Duration::ZERO);
        logger.trace(&trace(1, None));
        logger.info("hello");
        assert_eq!(logger.dropped(), 2);

        let logger = SinkLogger::unavailable(LogLevel::Info, Duration::ZERO);
        logger.info("hello");
        assert_eq!(logger.dropped(), 1);
    }

    #[test]
    fn test_concurrent_trace() {
        let (logger, lines) = memory_logger(LogLevel::Info, Duration::ZERO);
        let logger = Arc::new(logger);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let logger = logger.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        logger.trace(&trace(1, None));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(lines.lock().unwrap().len(), 800);
    }
}
