//! Basic usage of the logger facade
//!
//! Configure through the environment, for example:
//!
//! ```text
//! LOG_MODE=file,network LOG_FILE_PATH=logs/app.log \
//! LOG_NETWORK_IP=127.0.0.1 LOG_NETWORK_PORT=9999 LOG_UDP_FORMAT=json \
//! cargo run --example basic_usage
//! ```

use logix::prelude::*;
use logix::{critical, debug, info, trace, warn};

fn main() -> Result<()> {
    let logger = LoggerFacade::global();

    let state = logger.initialize();
    println!("Logger state after initialize: {}", state);

    info!(logger, "Application started");
    debug!(logger, "This debug message may not show if level is higher");

    logger.log_with_fields(
        LogLevel::Info,
        "Request handled",
        LogFields::new()
            .with_field("status", 200)
            .with_field("path", "/health")
            .with_field("cached", true),
    )?;

    // Change log level dynamically
    logger.set_level(LogLevel::Warn)?;
    debug!(logger, "This debug message should not appear");
    warn!(logger, "This warning message should appear");

    logger.set_level(LogLevel::Trace)?;
    trace!(logger, "This trace message should now appear");
    critical!(logger, "Simulated unrecoverable condition: {}", "disk full");

    logger.flush()?;
    let metrics = logger.metrics()?;
    println!(
        "Submitted: {}, delivered: {}, filtered: {}, failures: {}",
        metrics.submitted(),
        metrics.delivered(),
        metrics.filtered(),
        metrics.delivery_failures()
    );

    logger.shutdown();
    Ok(())
}
