//! Error types for the logging pipeline

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed configuration value; a default was substituted
    #[error("Invalid {key} value '{value}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    /// A sink could not be constructed and was left out of the sink set
    #[error("Failed to initialize {sink} sink: {message}")]
    SinkInit { sink: String, message: String },

    /// A single record could not be delivered to a single sink
    #[error("Delivery to {sink} sink failed: {message}")]
    Delivery { sink: String, message: String },

    /// The facade was used before `initialize()`
    #[error("Logger not initialized. Call initialize() first.")]
    NotInitialized,

    /// Initialization failed as a whole; the facade fell back to the null sink
    #[error("Failed to initialize logger: {message}")]
    CatastrophicInit { message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dispatch worker is gone
    #[error("Logger already stopped")]
    LoggerStopped,

    /// The dispatch worker thread could not be started
    #[error("Failed to spawn dispatch worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

impl LoggerError {
    /// Create a configuration error for an environment key
    pub fn config_invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LoggerError::ConfigInvalid {
            key: key.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a sink initialization error
    pub fn sink_init(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkInit {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a delivery error
    pub fn delivery(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Delivery {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a catastrophic initialization error
    pub fn catastrophic(message: impl Into<String>) -> Self {
        LoggerError::CatastrophicInit {
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Whether this error is a recoverable configuration problem
    pub fn is_config(&self) -> bool {
        matches!(self, LoggerError::ConfigInvalid { .. })
    }
}
