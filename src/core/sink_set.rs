//! Ordered set of sinks with per-sink thresholds

use super::{
    log_level::LogLevel, log_record::LogRecord, metrics::LoggerMetrics, sink::Sink,
};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Failures are reported on the first occurrence and every Nth after that
const REPORT_EVERY: u64 = 1000;

struct SinkSlot {
    sink: Box<dyn Sink>,
    level: LogLevel,
    failures: u64,
}

impl SinkSlot {
    fn note_failure(&mut self, index: usize, what: &str, detail: &str, panicked: bool) {
        self.failures += 1;
        if self.failures == 1 || self.failures % REPORT_EVERY == 0 {
            if panicked {
                eprintln!(
                    "[LOGGER CRITICAL] Sink #{} ({}) panicked during {}: {}. \
                     Other sinks continue to function.",
                    index,
                    self.sink.name(),
                    what,
                    detail
                );
            } else {
                eprintln!(
                    "[LOGGER ERROR] Sink #{} ({}) {} failed ({} failures so far): {}",
                    index,
                    self.sink.name(),
                    what,
                    self.failures,
                    detail
                );
            }
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// The active sinks of a logger, in delivery order.
///
/// Every slot carries its own threshold. Each sink call is isolated with
/// `catch_unwind`, so one failing or panicking sink never stops the others.
#[derive(Default)]
pub struct SinkSet {
    slots: Vec<SinkSlot>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn Sink>, level: LogLevel) {
        self.slots.push(SinkSlot {
            sink,
            level,
            failures: 0,
        });
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_sink<S: Sink + 'static>(mut self, sink: S, level: LogLevel) -> Self {
        self.push(Box::new(sink), level);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.sink.name().to_string()).collect()
    }

    pub fn levels(&self) -> Vec<LogLevel> {
        self.slots.iter().map(|s| s.level).collect()
    }

    /// Set every sink's threshold in one step
    pub fn set_level(&mut self, level: LogLevel) {
        for slot in &mut self.slots {
            slot.level = level;
        }
    }

    /// Hand `record` to every sink whose threshold admits it, in order
    pub fn deliver(&mut self, record: &LogRecord, metrics: &LoggerMetrics) {
        let mut delivered = false;

        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if !slot.level.admits(record.level) {
                continue;
            }

            let result = catch_unwind(AssertUnwindSafe(|| slot.sink.deliver(record)));
            match result {
                Ok(Ok(())) => delivered = true,
                Ok(Err(e)) => {
                    metrics.record_delivery_failure();
                    slot.note_failure(idx, "delivery", &e.to_string(), false);
                }
                Err(payload) => {
                    metrics.record_delivery_failure();
                    slot.note_failure(idx, "delivery", &panic_message(payload), true);
                }
            }
        }

        if delivered {
            metrics.record_delivered();
        }
    }

    /// Flush every sink regardless of threshold
    pub fn flush_all(&mut self, metrics: &LoggerMetrics) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| slot.sink.flush()));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    metrics.record_delivery_failure();
                    slot.note_failure(idx, "flush", &e.to_string(), false);
                }
                Err(payload) => {
                    metrics.record_delivery_failure();
                    slot.note_failure(idx, "flush", &panic_message(payload), true);
                }
            }
        }
    }

    /// Drop every sink, releasing files and sockets
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl std::fmt::Debug for SinkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|s| (s.sink.name(), s.level)))
            .finish()
    }
}
