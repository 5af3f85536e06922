//! Logging macros with `format!`-style arguments.
//!
//! Each macro takes a [`LoggerFacade`](crate::LoggerFacade) (or a reference to
//! one) as its first argument. The message is only formatted when the record
//! would pass the global threshold, and submission errors (such as logging
//! before `initialize()`) are ignored.
//!
//! # Examples
//!
//! ```
//! use logix::prelude::*;
//! use logix::info;
//!
//! let logger = LoggerFacade::new("app");
//! logger.initialize_with_config(Configuration::default());
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! logger.shutdown();
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use logix::prelude::*;
/// # let logger = LoggerFacade::new("app");
/// use logix::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.would_log(level) {
            let _ = logger.log(level, format!($($arg)+));
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use logix::prelude::*;
/// # let logger = LoggerFacade::new("app");
/// use logix::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// ```
/// # use logix::prelude::*;
/// # let logger = LoggerFacade::new("app");
/// use logix::critical;
/// critical!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
