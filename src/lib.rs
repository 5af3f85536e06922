//! # logix
//!
//! An environment-configured, asynchronous logging pipeline.
//!
//! Records are submitted through a [`LoggerFacade`] handle, queued on a
//! bounded FIFO and delivered by one background worker to every configured
//! sink: console, size-rotated file and UDP (plain text or JSON).
//!
//! ## Features
//!
//! - **Environment configuration**: `LOG_MODE`, `LOG_FILE_PATH`, `LOG_LEVEL`, ...
//!   with defaults for anything missing or malformed
//! - **Backpressure**: a full queue blocks the caller instead of dropping records
//! - **Partial failure tolerance**: a sink that cannot be built is skipped, a
//!   sink that fails at runtime never affects the others
//! - **Runtime level changes** applied in submission order
//!
//! ## Example
//!
//! ```no_run
//! use logix::prelude::*;
//!
//! let logger = LoggerFacade::global();
//! logger.initialize();
//!
//! logger.info("Application started");
//! logger.set_level(LogLevel::Warn)?;
//! logger.debug("not delivered");
//!
//! logger.shutdown();
//! # Ok::<(), logix::LoggerError>(())
//! ```

pub mod core;
pub mod facade;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Configuration, FieldValue, LogFields, LogLevel, LogMode, LogRecord, LoggerError,
        LoggerMetrics, PatternFormatter, Result, Sink, UdpFormat,
    };
    pub use crate::facade::{LoggerFacade, LoggerState};
}

pub use crate::core::{
    Configuration, EnvSource, FieldValue, LogFields, LogLevel, LogMode, LogRecord, LoggerError,
    LoggerMetrics, PatternFormatter, ProcessEnv, Result, Sink, UdpFormat,
};
pub use facade::{LoggerFacade, LoggerState, DEFAULT_LOGGER_NAME};
pub use sinks::SinkKind;
