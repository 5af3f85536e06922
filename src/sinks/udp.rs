//! UDP network sink
//!
//! Sends every record as a single datagram, either the pattern-rendered line
//! or the compact JSON object `{time, level, logger, message}`.
//! Delivery is best effort: send errors are reported to stderr and dropped.

use crate::core::{
    LogRecord, LoggerError, PatternFormatter, Result, Sink, StructuredRecord, UdpFormat,
};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Send failures are reported on the first occurrence and every Nth after that
const REPORT_EVERY: u64 = 1000;

/// UDP sink bound to one destination
///
/// The socket is bound and the destination resolved in [`UdpSink::new`];
/// both live as long as the sink.
///
/// # Example
///
/// ```no_run
/// use logix::core::{PatternFormatter, UdpFormat};
/// use logix::sinks::UdpSink;
///
/// let sink = UdpSink::new("127.0.0.1", 9999, PatternFormatter::default(), UdpFormat::Json)
///     .expect("valid destination");
/// assert_eq!(sink.target().port(), 9999);
/// ```
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
    format: UdpFormat,
    formatter: PatternFormatter,
    send_failures: u64,
}

impl UdpSink {
    /// Validate the destination, resolve it and bind a local socket
    ///
    /// # Errors
    ///
    /// [`LoggerError::SinkInit`] if the host is empty, the port is zero, the
    /// host does not resolve or no local socket can be bound.
    pub fn new(
        host: &str,
        port: u16,
        formatter: PatternFormatter,
        format: UdpFormat,
    ) -> Result<Self> {
        let host = host.trim();
        if host.is_empty() || port == 0 {
            return Err(LoggerError::sink_init(
                "network",
                format!("invalid destination '{}:{}': host and port are required", host, port),
            ));
        }

        let target = (host, port)
            .to_socket_addrs()
            .map_err(|e| {
                LoggerError::sink_init(
                    "network",
                    format!("cannot resolve '{}:{}': {}", host, port, e),
                )
            })?
            .next()
            .ok_or_else(|| {
                LoggerError::sink_init(
                    "network",
                    format!("'{}:{}' resolved to no address", host, port),
                )
            })?;

        let local = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).map_err(|e| {
            LoggerError::sink_init("network", format!("cannot bind UDP socket: {}", e))
        })?;

        Ok(Self {
            socket,
            target,
            format,
            formatter,
            send_failures: 0,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Datagrams that could not be encoded or sent
    pub fn send_failures(&self) -> u64 {
        self.send_failures
    }

    /// Datagram payload for `record`; plain text carries no trailing newline
    pub fn encode(&self, record: &LogRecord) -> Result<String> {
        match self.format {
            UdpFormat::Plain => Ok(self.formatter.format(record)),
            UdpFormat::Json => StructuredRecord::from_record(record).to_json(),
        }
    }

    fn note_failure(&mut self, detail: &str) {
        self.send_failures += 1;
        if self.send_failures == 1 || self.send_failures % REPORT_EVERY == 0 {
            eprintln!(
                "[LOGGER ERROR] UDP send to {} failed ({} failures so far): {}",
                self.target, self.send_failures, detail
            );
        }
    }
}

impl Sink for UdpSink {
    fn deliver(&mut self, record: &LogRecord) -> Result<()> {
        let payload = match self.encode(record) {
            Ok(payload) => payload,
            Err(e) => {
                self.note_failure(&e.to_string());
                return Ok(());
            }
        };

        if let Err(e) = self.socket.send_to(payload.as_bytes(), self.target) {
            self.note_failure(&e.to_string());
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "network"
    }
}

impl std::fmt::Debug for UdpSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpSink")
            .field("target", &self.target)
            .field("format", &self.format)
            .finish()
    }
}
