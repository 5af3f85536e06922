//! Environment-driven configuration
//!
//! [`Configuration::resolve`] reads the `LOG_*` variables of the process
//! environment. Resolution never fails: a missing value takes its default and a
//! malformed one takes its default plus a [`LoggerError::ConfigInvalid`]
//! warning in [`Resolved::warnings`].

use super::error::LoggerError;
use super::formatter::DEFAULT_PATTERN;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_MODE: &str = "LOG_MODE";
pub const ENV_FILE_PATH: &str = "LOG_FILE_PATH";
pub const ENV_NETWORK_IP: &str = "LOG_NETWORK_IP";
pub const ENV_NETWORK_PORT: &str = "LOG_NETWORK_PORT";
pub const ENV_FILE_SIZE_MB: &str = "LOG_FILE_SIZE_MB";
pub const ENV_NUMBER_OF_LOG_FILES: &str = "LOG_NUMBER_OF_LOG_FILES";
pub const ENV_LEVEL: &str = "LOG_LEVEL";
pub const ENV_PATTERN: &str = "LOG_PATTERN";
pub const ENV_UDP_FORMAT: &str = "LOG_UDP_FORMAT";

pub const DEFAULT_FILE_SIZE_MB: u64 = 5;
pub const DEFAULT_NUMBER_OF_LOG_FILES: usize = 3;
pub const DEFAULT_QUEUE_CAPACITY: usize = 8192;

/// Source of `LOG_*` values
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| (*v).to_string())
    }
}

/// One entry of `LOG_MODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    None,
    File,
    Network,
}

impl LogMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogMode::None => "none",
            LogMode::File => "file",
            LogMode::Network => "network",
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(LogMode::None),
            "file" => Ok(LogMode::File),
            "network" => Ok(LogMode::Network),
            _ => Err(format!("Unknown log mode: '{}'", s.trim())),
        }
    }
}

/// Datagram encoding of the UDP sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UdpFormat {
    #[default]
    Json,
    Plain,
}

impl UdpFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            UdpFormat::Json => "json",
            UdpFormat::Plain => "plain",
        }
    }
}

impl fmt::Display for UdpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UdpFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(UdpFormat::Json),
            "plain" => Ok(UdpFormat::Plain),
            _ => Err(format!("Unknown UDP format: '{}'", s)),
        }
    }
}

/// Immutable configuration snapshot taken at initialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub modes: Vec<LogMode>,
    pub file_path: Option<PathBuf>,
    pub file_size_mb: u64,
    pub number_of_log_files: usize,
    pub network_host: String,
    pub network_port: u16,
    pub udp_format: UdpFormat,
    pub level: LogLevel,
    pub pattern: String,
    pub queue_capacity: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            modes: vec![LogMode::None],
            file_path: None,
            file_size_mb: DEFAULT_FILE_SIZE_MB,
            number_of_log_files: DEFAULT_NUMBER_OF_LOG_FILES,
            network_host: String::new(),
            network_port: 0,
            udp_format: UdpFormat::default(),
            level: LogLevel::Debug,
            pattern: DEFAULT_PATTERN.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Result of resolving configuration: the values plus every warning raised
#[derive(Debug)]
pub struct Resolved {
    pub config: Configuration,
    pub warnings: Vec<LoggerError>,
}

impl Configuration {
    /// Resolve from the process environment
    pub fn resolve() -> Resolved {
        Self::resolve_from(&ProcessEnv)
    }

    /// Resolve from any key/value source
    pub fn resolve_from(env: &dyn EnvSource) -> Resolved {
        let mut config = Configuration::default();
        let mut warnings = Vec::new();

        if let Some(raw) = env.var(ENV_MODE) {
            config.modes = parse_modes(&raw, &mut warnings);
        }

        config.file_path = env
            .var(ENV_FILE_PATH)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        if let Some(host) = env.var(ENV_NETWORK_IP) {
            config.network_host = host.trim().to_string();
        }

        if let Some(raw) = env.var(ENV_FILE_SIZE_MB) {
            match raw.trim().parse::<u64>() {
                Ok(size) if size > 0 => config.file_size_mb = size,
                _ => warnings.push(LoggerError::config_invalid(
                    ENV_FILE_SIZE_MB,
                    raw,
                    format!(
                        "must be a positive number. Using default {}MB.",
                        DEFAULT_FILE_SIZE_MB
                    ),
                )),
            }
        }

        if let Some(raw) = env.var(ENV_NUMBER_OF_LOG_FILES) {
            match raw.trim().parse::<usize>() {
                Ok(count) if count > 0 => config.number_of_log_files = count,
                _ => warnings.push(LoggerError::config_invalid(
                    ENV_NUMBER_OF_LOG_FILES,
                    raw,
                    format!(
                        "must be a positive number. Using default {}.",
                        DEFAULT_NUMBER_OF_LOG_FILES
                    ),
                )),
            }
        }

        if let Some(raw) = env.var(ENV_NETWORK_PORT) {
            match raw.trim().parse::<u16>() {
                Ok(port) => config.network_port = port,
                Err(_) => warnings.push(LoggerError::config_invalid(
                    ENV_NETWORK_PORT,
                    raw,
                    "not a valid port. Using default (0).",
                )),
            }
        }

        if let Some(raw) = env.var(ENV_LEVEL) {
            match raw.parse::<LogLevel>() {
                Ok(level) => config.level = level,
                Err(_) => warnings.push(LoggerError::config_invalid(
                    ENV_LEVEL,
                    raw,
                    format!("unknown level. Using default ({}).", LogLevel::Debug),
                )),
            }
        }

        if let Some(pattern) = env.var(ENV_PATTERN).filter(|p| !p.is_empty()) {
            config.pattern = pattern;
        }

        if let Some(raw) = env.var(ENV_UDP_FORMAT) {
            match raw.parse::<UdpFormat>() {
                Ok(format) => config.udp_format = format,
                Err(_) => warnings.push(LoggerError::config_invalid(
                    ENV_UDP_FORMAT,
                    raw,
                    "expected json or plain. Using default (json).",
                )),
            }
        }

        Resolved { config, warnings }
    }

    /// `true` when `none` is the only mode: nothing is built and nothing is logged
    pub fn is_disabled(&self) -> bool {
        self.modes == [LogMode::None]
    }

    /// Rotation threshold in bytes
    pub fn file_size_bytes(&self) -> u64 {
        self.file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Modes joined for diagnostics, e.g. `file, network`
    pub fn modes_display(&self) -> String {
        self.modes
            .iter()
            .map(LogMode::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_modes(mut self, modes: impl IntoIterator<Item = LogMode>) -> Self {
        self.modes = modes.into_iter().collect();
        if self.modes.is_empty() {
            self.modes.push(LogMode::None);
        }
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_rotation(mut self, size_mb: u64, number_of_files: usize) -> Self {
        self.file_size_mb = size_mb;
        self.number_of_log_files = number_of_files;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_network(mut self, host: impl Into<String>, port: u16) -> Self {
        self.network_host = host.into();
        self.network_port = port;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_udp_format(mut self, format: UdpFormat) -> Self {
        self.udp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }
}

/// Split `LOG_MODE`; blanks are skipped, unknown names warn and are skipped.
///
/// Only a list with no entries at all means `[none]`. A list whose entries are
/// all unknown stays empty, which still gets the console sink.
fn parse_modes(raw: &str, warnings: &mut Vec<LoggerError>) -> Vec<LogMode> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return vec![LogMode::None];
    }

    let mut modes = Vec::new();
    for part in parts {
        match part.parse::<LogMode>() {
            Ok(mode) => modes.push(mode),
            Err(message) => warnings.push(LoggerError::config_invalid(ENV_MODE, part, message)),
        }
    }
    modes
}
