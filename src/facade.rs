//! Logger facade
//!
//! [`LoggerFacade`] is the handle applications log through. It owns the
//! initialization state machine:
//!
//! ```text
//! Uninitialized --initialize()--> Initializing --> Ready
//!                                              \--> Degraded (null sink)
//! Ready | Degraded --shutdown()--> Uninitialized
//! ```
//!
//! `initialize()` never fails. Bad configuration values fall back to defaults,
//! sinks that cannot be built are left out, and anything worse leaves the
//! facade `Degraded`: usable, but every record is discarded.

use crate::core::{
    Configuration, Diagnostic, Dispatcher, EnvSource, LogFields, LogLevel, LogRecord,
    LoggerError, LoggerMetrics, ProcessEnv, Resolved, Result,
};
use crate::sinks::{build_sinks, null_sinks};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

/// Name records are logged under unless the handle is created with another
pub const DEFAULT_LOGGER_NAME: &str = "async_logger";

/// Lifecycle state of a [`LoggerFacade`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoggerState {
    Uninitialized,
    Initializing,
    Ready,
    /// Initialization failed; records go to the null sink
    Degraded,
}

impl LoggerState {
    /// `Ready` or `Degraded`
    pub fn is_initialized(&self) -> bool {
        matches!(self, LoggerState::Ready | LoggerState::Degraded)
    }
}

impl fmt::Display for LoggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoggerState::Uninitialized => "uninitialized",
            LoggerState::Initializing => "initializing",
            LoggerState::Ready => "ready",
            LoggerState::Degraded => "degraded",
        };
        f.write_str(s)
    }
}

/// Everything that exists between `initialize()` and `shutdown()`
struct Active {
    config: Configuration,
    dispatcher: Dispatcher,
    degraded: bool,
}

impl Active {
    /// Whether records can reach a real sink
    fn accepts_diagnostics(&self) -> bool {
        !self.degraded && !self.config.is_disabled()
    }
}

enum State {
    Uninitialized,
    Initializing,
    Active(Active),
}

struct Inner {
    name: Arc<str>,
    state: RwLock<State>,
    /// Serializes `initialize` and `shutdown`
    lifecycle: Mutex<()>,
}

/// Cloneable handle to one logging pipeline
///
/// Clones share the same pipeline. Most programs create one handle at
/// startup and pass it around; [`LoggerFacade::global`] offers a lazily
/// created process-wide handle for code that cannot be handed one.
///
/// # Example
///
/// ```
/// use logix::{Configuration, LogLevel, LoggerFacade, LoggerState};
///
/// let logger = LoggerFacade::new("app");
/// assert!(logger.set_level(LogLevel::Info).is_err());
///
/// let state = logger.initialize_with_config(Configuration::default());
/// assert_eq!(state, LoggerState::Ready);
///
/// logger.info("logging is disabled by default, so this goes nowhere");
/// logger.shutdown();
/// assert_eq!(logger.state(), LoggerState::Uninitialized);
/// ```
#[derive(Clone)]
pub struct LoggerFacade {
    inner: Arc<Inner>,
}

static GLOBAL: OnceLock<LoggerFacade> = OnceLock::new();

impl LoggerFacade {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                state: RwLock::new(State::Uninitialized),
                lifecycle: Mutex::new(()),
            }),
        }
    }

    /// Process-wide handle named [`DEFAULT_LOGGER_NAME`], created on first use
    pub fn global() -> &'static LoggerFacade {
        GLOBAL.get_or_init(|| LoggerFacade::new(DEFAULT_LOGGER_NAME))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn state(&self) -> LoggerState {
        match &*self.inner.state.read() {
            State::Uninitialized => LoggerState::Uninitialized,
            State::Initializing => LoggerState::Initializing,
            State::Active(active) if active.degraded => LoggerState::Degraded,
            State::Active(_) => LoggerState::Ready,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state().is_initialized()
    }

    /// Initialize from the process environment
    pub fn initialize(&self) -> LoggerState {
        self.initialize_from(&ProcessEnv)
    }

    /// Initialize from any source of `LOG_*` values
    pub fn initialize_from(&self, env: &dyn EnvSource) -> LoggerState {
        self.run_initialization(|| Configuration::resolve_from(env))
    }

    /// Initialize from an already built configuration
    pub fn initialize_with_config(&self, config: Configuration) -> LoggerState {
        self.run_initialization(move || Resolved {
            config,
            warnings: Vec::new(),
        })
    }

    fn run_initialization<F>(&self, resolve: F) -> LoggerState
    where
        F: FnOnce() -> Resolved,
    {
        let _lifecycle = self.inner.lifecycle.lock();

        {
            let mut state = self.inner.state.write();
            if let State::Active(active) = &*state {
                let warning = Diagnostic::warn("Logger already initialized. Skipping re-initialization.");
                self.emit(active, warning);
                return if active.degraded {
                    LoggerState::Degraded
                } else {
                    LoggerState::Ready
                };
            }
            *state = State::Initializing;
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| self.assemble(resolve())));
        let (active, diagnostics) = match outcome {
            Ok(Ok(assembled)) => assembled,
            Ok(Err(e)) => Self::degraded(e.to_string()),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unexpected panic".to_string());
                Self::degraded(reason)
            }
        };

        for diagnostic in diagnostics {
            self.emit(&active, diagnostic);
        }

        let result = if active.degraded {
            LoggerState::Degraded
        } else {
            LoggerState::Ready
        };
        *self.inner.state.write() = State::Active(active);
        result
    }

    /// Build the pipeline for `resolved`; per-sink problems become diagnostics
    fn assemble(&self, resolved: Resolved) -> Result<(Active, Vec<Diagnostic>)> {
        let Resolved { config, warnings } = resolved;
        let mut diagnostics: Vec<Diagnostic> = warnings.into_iter().map(Diagnostic::from).collect();

        if config.is_disabled() {
            diagnostics.push(Diagnostic::info("Logger initialized. Mode: none"));
            let dispatcher = Dispatcher::inline(null_sinks(), LogLevel::Off);
            return Ok((
                Active {
                    config,
                    dispatcher,
                    degraded: false,
                },
                diagnostics,
            ));
        }

        let built = build_sinks(&config);
        diagnostics.extend(built.diagnostics);

        let dispatcher = Dispatcher::spawn(built.sinks, config.queue_capacity, config.level)?;

        diagnostics.push(Diagnostic::info(format!(
            "Logger initialized. Modes: {}, File: {}, Network: {}:{}, Level: {}, UDP Format: {}",
            config.modes_display(),
            config
                .file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            config.network_host,
            config.network_port,
            config.level,
            config.udp_format,
        )));

        Ok((
            Active {
                config,
                dispatcher,
                degraded: false,
            },
            diagnostics,
        ))
    }

    /// Null-sink fallback after a failed initialization
    fn degraded(reason: String) -> (Active, Vec<Diagnostic>) {
        let dispatcher = Dispatcher::inline(null_sinks(), LogLevel::Off);
        let active = Active {
            config: Configuration::default(),
            dispatcher,
            degraded: true,
        };
        let diagnostic = Diagnostic::from(LoggerError::catastrophic(reason));
        (active, vec![diagnostic])
    }

    /// Route a diagnostic through the pipeline. When no real sink exists,
    /// warnings and worse go to stderr and the rest is dropped.
    fn emit(&self, active: &Active, diagnostic: Diagnostic) {
        if !active.accepts_diagnostics() {
            if diagnostic.level >= LogLevel::Warn {
                diagnostic.to_stderr();
            }
            return;
        }
        let record = LogRecord::new(diagnostic.level, Arc::clone(&self.inner.name), &diagnostic.message);
        if active.dispatcher.submit(record).is_err() {
            diagnostic.to_stderr();
        }
    }

    fn with_active<T>(&self, f: impl FnOnce(&Active) -> Result<T>) -> Result<T> {
        match &*self.inner.state.read() {
            State::Active(active) => f(active),
            State::Uninitialized | State::Initializing => Err(LoggerError::NotInitialized),
        }
    }

    /// Submit one record.
    ///
    /// # Errors
    ///
    /// [`LoggerError::NotInitialized`] before `initialize()`. Sink failures are
    /// never returned here.
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) -> Result<()> {
        self.with_active(|active| {
            let record = LogRecord::new(level, Arc::clone(&self.inner.name), message);
            active.dispatcher.submit(record)
        })
    }

    /// Submit one record with structured fields
    pub fn log_with_fields(
        &self,
        level: LogLevel,
        message: impl AsRef<str>,
        fields: LogFields,
    ) -> Result<()> {
        self.with_active(|active| {
            let record =
                LogRecord::new(level, Arc::clone(&self.inner.name), message).with_fields(fields);
            active.dispatcher.submit(record)
        })
    }

    /// Whether a record at `level` would pass the global threshold
    pub fn would_log(&self, level: LogLevel) -> bool {
        self.with_active(|active| Ok(active.dispatcher.would_log(level)))
            .unwrap_or(false)
    }

    pub fn trace(&self, message: impl AsRef<str>) {
        let _ = self.log(LogLevel::Trace, message);
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        let _ = self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        let _ = self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        let _ = self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        let _ = self.log(LogLevel::Error, message);
    }

    pub fn critical(&self, message: impl AsRef<str>) {
        let _ = self.log(LogLevel::Critical, message);
    }

    /// Change the global threshold and every sink's threshold.
    ///
    /// Records submitted before the call are filtered with the old thresholds,
    /// records submitted after it with the new ones.
    ///
    /// # Errors
    ///
    /// [`LoggerError::NotInitialized`] before `initialize()`.
    pub fn set_level(&self, level: LogLevel) -> Result<()> {
        self.with_active(|active| {
            active.dispatcher.set_level(level)?;
            self.emit(active, Diagnostic::info(format!("Log level changed to: {}", level)));
            Ok(())
        })
    }

    /// Block until everything logged so far has been delivered and flushed
    ///
    /// # Errors
    ///
    /// [`LoggerError::NotInitialized`] before `initialize()`.
    pub fn flush(&self) -> Result<()> {
        self.with_active(|active| active.dispatcher.flush())
    }

    /// Drain and stop the pipeline, release every sink and return to
    /// `Uninitialized`. Does nothing when not initialized.
    pub fn shutdown(&self) {
        let _lifecycle = self.inner.lifecycle.lock();

        let previous = std::mem::replace(&mut *self.inner.state.write(), State::Uninitialized);
        if let State::Active(active) = previous {
            if let Err(e) = active.dispatcher.shutdown() {
                Diagnostic::from(e).to_stderr();
            }
        }
    }

    /// Current global threshold
    pub fn level(&self) -> Result<LogLevel> {
        self.with_active(|active| Ok(active.dispatcher.level()))
    }

    /// Names of the active sinks, in delivery order
    pub fn sink_names(&self) -> Result<Vec<String>> {
        self.with_active(|active| Ok(active.dispatcher.sink_names().to_vec()))
    }

    /// Configuration the pipeline was built from
    pub fn config(&self) -> Result<Configuration> {
        self.with_active(|active| Ok(active.config.clone()))
    }

    /// Snapshot of the pipeline counters
    pub fn metrics(&self) -> Result<LoggerMetrics> {
        self.with_active(|active| Ok(active.dispatcher.metrics().clone()))
    }
}

impl Default for LoggerFacade {
    fn default() -> Self {
        Self::new(DEFAULT_LOGGER_NAME)
    }
}

impl fmt::Debug for LoggerFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerFacade")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .finish()
    }
}
