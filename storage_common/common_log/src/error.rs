//! SQL logger error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// Verbosity or threshold values are malformed
    #[error("Invalid log config: {0}")]
    InvalidLogConfig(String),

    /// Log sink could not be created
    #[error("Failed to create log sink: {0}")]
    Sink(String),
}
