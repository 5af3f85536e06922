//! Core pipeline types and traits

pub mod config;
pub mod diagnostic;
pub mod dispatcher;
pub mod error;
pub mod formatter;
pub mod log_fields;
pub mod log_level;
pub mod log_record;
pub mod metrics;
pub mod sink;
pub mod sink_set;

pub use config::{
    Configuration, EnvSource, LogMode, ProcessEnv, Resolved, UdpFormat, DEFAULT_FILE_SIZE_MB,
    DEFAULT_NUMBER_OF_LOG_FILES, DEFAULT_QUEUE_CAPACITY,
};
pub use diagnostic::Diagnostic;
pub use dispatcher::{Dispatcher, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use formatter::{FormattedLine, PatternFormatter, StructuredRecord, DEFAULT_PATTERN};
pub use log_fields::{FieldValue, LogFields};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use sink_set::SinkSet;
