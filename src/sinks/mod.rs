//! Built-in sinks and the builder that assembles them from a [`Configuration`]

pub mod console;
pub mod null;
pub mod rotating_file;
pub mod udp;

pub use console::ConsoleSink;
pub use null::NullSink;
pub use rotating_file::{probe_writable, RotatingFileSink, RotationPolicy};
pub use udp::UdpSink;

use crate::core::{
    Configuration, Diagnostic, LogLevel, LogMode, LoggerError, PatternFormatter, Result, Sink,
    SinkSet,
};
use std::fmt;

/// The closed set of sink kinds the facade knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Null,
    Console,
    RotatingFile,
    UdpNetwork,
}

impl SinkKind {
    /// Name reported by the built sink
    pub fn name(&self) -> &'static str {
        match self {
            SinkKind::Null => "null",
            SinkKind::Console => "console",
            SinkKind::RotatingFile => "file",
            SinkKind::UdpNetwork => "network",
        }
    }

    /// Sink requested by a `LOG_MODE` entry; `none` requests nothing
    pub fn for_mode(mode: LogMode) -> Option<SinkKind> {
        match mode {
            LogMode::None => None,
            LogMode::File => Some(SinkKind::RotatingFile),
            LogMode::Network => Some(SinkKind::UdpNetwork),
        }
    }

    /// Construct a sink of this kind.
    ///
    /// Informational notes (such as a created log directory) are appended to
    /// `notes`.
    ///
    /// # Errors
    ///
    /// [`LoggerError::SinkInit`] when the configuration does not allow this
    /// sink or its resource cannot be acquired.
    pub fn build(self, config: &Configuration, notes: &mut Vec<Diagnostic>) -> Result<Box<dyn Sink>> {
        let formatter = PatternFormatter::new(config.pattern.clone());

        match self {
            SinkKind::Null => Ok(Box::new(NullSink::new())),
            SinkKind::Console => Ok(Box::new(ConsoleSink::new(formatter))),
            SinkKind::RotatingFile => {
                let path = config.file_path.as_ref().ok_or_else(|| {
                    LoggerError::sink_init("file", "LOG_FILE_PATH not set for file mode")
                })?;

                if probe_writable(path)? {
                    if let Some(parent) = path.parent() {
                        notes.push(Diagnostic::info(format!(
                            "Created parent directory: {}",
                            parent.display()
                        )));
                    }
                }

                let policy = RotationPolicy::new()
                    .with_max_bytes(config.file_size_bytes())
                    .with_max_files(config.number_of_log_files);
                Ok(Box::new(RotatingFileSink::new(path, policy, formatter)?))
            }
            SinkKind::UdpNetwork => Ok(Box::new(UdpSink::new(
                &config.network_host,
                config.network_port,
                formatter,
                config.udp_format,
            )?)),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sinks built for one configuration plus what happened while building them
#[derive(Debug)]
pub struct BuiltSinks {
    pub sinks: SinkSet,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the sink set for an enabled configuration.
///
/// Console always comes first, followed by one sink per mode in listed order.
/// A sink that fails to build is left out and reported in
/// [`BuiltSinks::diagnostics`]; the others are unaffected. Every sink starts
/// at the configured level.
pub fn build_sinks(config: &Configuration) -> BuiltSinks {
    let mut sinks = SinkSet::new();
    let mut diagnostics = Vec::new();

    let kinds = std::iter::once(SinkKind::Console)
        .chain(config.modes.iter().copied().filter_map(SinkKind::for_mode));

    for kind in kinds {
        match kind.build(config, &mut diagnostics) {
            Ok(sink) => sinks.push(sink, config.level),
            Err(e) => diagnostics.push(Diagnostic::from(e)),
        }
    }

    BuiltSinks { sinks, diagnostics }
}

/// The sink set used when logging is off or initialization failed
pub fn null_sinks() -> SinkSet {
    SinkSet::new().with_sink(NullSink::new(), LogLevel::Off)
}
