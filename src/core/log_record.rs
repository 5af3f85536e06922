//! Log record structure

use super::log_fields::LogFields;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
}

/// Cached numeric-ish thread id of the calling thread
fn current_thread_id() -> Arc<str> {
    THREAD_ID_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        match cache.as_ref() {
            Some(id) => Arc::clone(id),
            None => {
                let raw = format!("{:?}", std::thread::current().id());
                // "ThreadId(7)" -> "7"
                let id: Arc<str> = raw
                    .trim_start_matches("ThreadId(")
                    .trim_end_matches(')')
                    .into();
                *cache = Some(Arc::clone(&id));
                id
            }
        }
    })
}

/// One log call, immutable once built.
///
/// Records are owned by the dispatch pipeline from `submit` until every sink
/// has seen them.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub logger: Arc<str>,
    pub message: String,
    pub fields: Option<LogFields>,
    pub thread_id: Arc<str>,
}

impl LogRecord {
    /// Replace line breaks and tabs with escape sequences so a message can
    /// never forge additional log lines.
    fn sanitize_message(message: &str) -> String {
        if !message.contains(['\n', '\r', '\t']) {
            return message.to_string();
        }
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, logger: impl Into<Arc<str>>, message: impl AsRef<str>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            logger: logger.into(),
            message: Self::sanitize_message(message.as_ref()),
            fields: None,
            thread_id: current_thread_id(),
        }
    }

    pub fn with_fields(mut self, fields: LogFields) -> Self {
        self.fields = if fields.is_empty() { None } else { Some(fields) };
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The message with structured fields appended, as rendered by `%v`
    pub fn payload(&self) -> String {
        match &self.fields {
            Some(fields) => format!("{} | {}", self.message, fields),
            None => self.message.clone(),
        }
    }
}
