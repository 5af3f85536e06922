//! Messages the logger emits about itself
//!
//! During initialization there is no pipeline yet, so warnings and failures
//! are collected as [`Diagnostic`]s and replayed once the sinks exist. When no
//! sink can take them they go to stderr.

use super::error::LoggerError;
use super::log_level::LogLevel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: LogLevel,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    /// `[LOGGER WARNING]`-style prefix for stderr output
    pub fn prefix(&self) -> &'static str {
        match self.level {
            LogLevel::Trace | LogLevel::Debug | LogLevel::Info => "[LOGGER INFO]",
            LogLevel::Warn => "[LOGGER WARNING]",
            LogLevel::Error => "[LOGGER ERROR]",
            LogLevel::Critical | LogLevel::Off => "[LOGGER CRITICAL]",
        }
    }

    pub fn to_stderr(&self) {
        eprintln!("{} {}", self.prefix(), self.message);
    }
}

impl From<LoggerError> for Diagnostic {
    fn from(err: LoggerError) -> Self {
        let level = match &err {
            LoggerError::ConfigInvalid { .. } => LogLevel::Warn,
            LoggerError::CatastrophicInit { .. } => LogLevel::Critical,
            _ => LogLevel::Error,
        };
        Self::new(level, err.to_string())
    }
}
