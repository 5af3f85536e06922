//! Sink trait for log delivery destinations

use super::{error::Result, log_record::LogRecord};

/// A destination for log records.
///
/// Sinks are owned by the dispatch worker and only ever touched from that one
/// thread, so implementations need `Send` but no internal locking. Level
/// filtering happens in [`SinkSet`](super::SinkSet) before `deliver` is called.
///
/// # Example
///
/// ```
/// use logix::core::{LogRecord, Result, Sink};
///
/// struct CountingSink {
///     seen: usize,
/// }
///
/// impl Sink for CountingSink {
///     fn deliver(&mut self, _record: &LogRecord) -> Result<()> {
///         self.seen += 1;
///         Ok(())
///     }
///
///     fn flush(&mut self) -> Result<()> {
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "counting"
///     }
/// }
/// ```
pub trait Sink: Send {
    /// Deliver one record. Errors are counted and reported by the pipeline,
    /// never returned to the code that logged.
    fn deliver(&mut self, record: &LogRecord) -> Result<()>;

    /// Push any buffered output to its destination
    fn flush(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn deliver(&mut self, record: &LogRecord) -> Result<()> {
        (**self).deliver(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
