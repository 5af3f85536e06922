//! Null sink

use crate::core::{LogRecord, Result, Sink};

/// Accepts every record and discards it.
///
/// Used when `LOG_MODE=none` and as the fallback of a degraded logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for NullSink {
    #[inline]
    fn deliver(&mut self, _record: &LogRecord) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
