//! Dispatch pipeline
//!
//! Decouples log call sites from sink I/O: callers enqueue records on a bounded
//! FIFO and a single worker thread delivers them to the [`SinkSet`] in order.
//! A full queue blocks the caller until the worker frees a slot.

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    sink_set::SinkSet,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long `Drop` waits for the worker when `shutdown()` was not called
///
/// Explicit [`Dispatcher::shutdown`] always waits for the queue to drain.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const WORKER_THREAD_NAME: &str = "logix-dispatch";

enum Command {
    Record(LogRecord),
    SetLevel(LogLevel),
    Flush(Sender<()>),
}

enum Mode {
    /// Bounded queue drained by a dedicated worker
    Async {
        sender: Option<Sender<Command>>,
        worker: Option<thread::JoinHandle<()>>,
        capacity: usize,
    },
    /// Delivery on the calling thread; used for the null fallback, which must
    /// not depend on being able to start a thread
    Inline(Mutex<SinkSet>),
}

pub struct Dispatcher {
    level: AtomicU8,
    /// Serializes level changes so the queued command and the stored level agree
    level_change: Mutex<()>,
    metrics: Arc<LoggerMetrics>,
    sink_names: Vec<String>,
    mode: Mode,
}

impl Dispatcher {
    /// Start a worker thread that owns `sinks`
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::WorkerSpawn`] if the thread cannot be created.
    pub fn spawn(sinks: SinkSet, capacity: usize, level: LogLevel) -> Result<Self> {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        let metrics = Arc::new(LoggerMetrics::new());
        let metrics_clone = Arc::clone(&metrics);
        let sink_names = sinks.names();

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || Self::run(receiver, sinks, &metrics_clone))
            .map_err(LoggerError::WorkerSpawn)?;

        Ok(Self {
            level: AtomicU8::new(level as u8),
            level_change: Mutex::new(()),
            metrics,
            sink_names,
            mode: Mode::Async {
                sender: Some(sender),
                worker: Some(worker),
                capacity,
            },
        })
    }

    /// Deliver synchronously on the caller's thread
    pub fn inline(sinks: SinkSet, level: LogLevel) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
            level_change: Mutex::new(()),
            metrics: Arc::new(LoggerMetrics::new()),
            sink_names: sinks.names(),
            mode: Mode::Inline(Mutex::new(sinks)),
        }
    }

    /// Worker loop: one command at a time, in enqueue order
    fn run(receiver: Receiver<Command>, mut sinks: SinkSet, metrics: &LoggerMetrics) {
        for command in receiver.iter() {
            match command {
                Command::Record(record) => {
                    sinks.deliver(&record, metrics);
                    // Queue drained: push buffered output out
                    if receiver.is_empty() {
                        sinks.flush_all(metrics);
                    }
                }
                Command::SetLevel(level) => sinks.set_level(level),
                Command::Flush(ack) => {
                    sinks.flush_all(metrics);
                    let _ = ack.send(());
                }
            }
        }

        // Channel closed: everything queued has been delivered
        sinks.flush_all(metrics);
        sinks.clear();
    }

    /// Current global threshold
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Acquire))
    }

    /// Whether a record at `level` would pass the global threshold
    #[inline]
    pub fn would_log(&self, level: LogLevel) -> bool {
        self.level().admits(level)
    }

    pub fn is_async(&self) -> bool {
        matches!(self.mode, Mode::Async { .. })
    }

    /// Queue capacity, `None` for inline delivery
    pub fn capacity(&self) -> Option<usize> {
        match &self.mode {
            Mode::Async { capacity, .. } => Some(*capacity),
            Mode::Inline(_) => None,
        }
    }

    pub fn sink_names(&self) -> &[String] {
        &self.sink_names
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Enqueue a record for delivery.
    ///
    /// Records below the global threshold are counted and discarded here. When
    /// the queue is full this blocks until the worker makes room.
    ///
    /// # Errors
    ///
    /// [`LoggerError::LoggerStopped`] if the worker is gone.
    pub fn submit(&self, record: LogRecord) -> Result<()> {
        if !self.would_log(record.level) {
            self.metrics.record_filtered();
            return Ok(());
        }

        match &self.mode {
            Mode::Async { sender, .. } => {
                let sender = sender.as_ref().ok_or(LoggerError::LoggerStopped)?;
                match sender.try_send(Command::Record(record)) {
                    Ok(()) => {}
                    Err(TrySendError::Full(command)) => {
                        self.metrics.record_block();
                        sender
                            .send(command)
                            .map_err(|_| LoggerError::LoggerStopped)?;
                    }
                    Err(TrySendError::Disconnected(_)) => return Err(LoggerError::LoggerStopped),
                }
            }
            Mode::Inline(sinks) => sinks.lock().deliver(&record, &self.metrics),
        }

        self.metrics.record_submitted();
        Ok(())
    }

    /// Change the global threshold and every sink's threshold.
    ///
    /// The sink update travels through the queue, so records enqueued before
    /// this call are still filtered with the old thresholds and every later
    /// record with the new ones. The global threshold changes only once the
    /// command is queued: a record admitted by the new level is always queued
    /// behind it.
    pub fn set_level(&self, level: LogLevel) -> Result<()> {
        let _guard = self.level_change.lock();
        match &self.mode {
            Mode::Async { sender, .. } => sender
                .as_ref()
                .ok_or(LoggerError::LoggerStopped)?
                .send(Command::SetLevel(level))
                .map_err(|_| LoggerError::LoggerStopped)?,
            Mode::Inline(sinks) => sinks.lock().set_level(level),
        }
        self.level.store(level as u8, Ordering::Release);
        Ok(())
    }

    /// Block until every record submitted before this call has been delivered
    /// and every sink has been flushed
    pub fn flush(&self) -> Result<()> {
        match &self.mode {
            Mode::Async { sender, .. } => {
                let sender = sender.as_ref().ok_or(LoggerError::LoggerStopped)?;
                let (ack_tx, ack_rx) = bounded(1);
                sender
                    .send(Command::Flush(ack_tx))
                    .map_err(|_| LoggerError::LoggerStopped)?;
                ack_rx.recv().map_err(|_| LoggerError::LoggerStopped)
            }
            Mode::Inline(sinks) => {
                sinks.lock().flush_all(&self.metrics);
                Ok(())
            }
        }
    }

    /// Drain the queue, flush and release every sink, and stop the worker.
    ///
    /// Blocks until the worker has delivered everything already queued.
    pub fn shutdown(mut self) -> Result<()> {
        match &mut self.mode {
            Mode::Async { sender, worker, .. } => {
                drop(sender.take());
                if let Some(handle) = worker.take() {
                    handle.join().map_err(|_| {
                        LoggerError::delivery("dispatch", "worker thread panicked during shutdown")
                    })?;
                }
            }
            Mode::Inline(sinks) => {
                let mut sinks = sinks.lock();
                sinks.flush_all(&self.metrics);
                sinks.clear();
            }
        }
        Ok(())
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        let Mode::Async { sender, worker, .. } = &mut self.mode else {
            return;
        };

        // Closing the channel lets the worker drain what is queued and exit
        drop(sender.take());

        if let Some(handle) = worker.take() {
            let start = std::time::Instant::now();
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Dispatch worker panicked during shutdown: {:?}", e);
                    }
                    break;
                }

                if start.elapsed() >= DEFAULT_SHUTDOWN_TIMEOUT {
                    eprintln!(
                        "[LOGGER WARNING] Dispatch worker did not finish within {:?}. \
                         Some logs may be lost.",
                        DEFAULT_SHUTDOWN_TIMEOUT
                    );
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("level", &self.level())
            .field("sinks", &self.sink_names)
            .field("async", &self.is_async())
            .finish()
    }
}
