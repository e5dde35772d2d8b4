//! Forwarding of client log records into the harness log stream.

use std::sync::Arc;

use tracing::Level;

use crate::client::{LogRecord, LogSink};

/// Sink that re-emits client records as tracing events under the `client`
/// target.
pub fn reporting_sink() -> LogSink {
    Arc::new(|record: &LogRecord| {
        let LogRecord {
            level,
            function,
            file,
            line,
            message,
        } = record;
        match *level {
            Level::ERROR => {
                tracing::error!(target: "client", "{} @ {}[{}:{}]", message, function, file, line)
            }
            Level::WARN => {
                tracing::warn!(target: "client", "{} @ {}[{}:{}]", message, function, file, line)
            }
            Level::INFO => {
                tracing::info!(target: "client", "{} @ {}[{}:{}]", message, function, file, line)
            }
            Level::DEBUG => {
                tracing::debug!(target: "client", "{} @ {}[{}:{}]", message, function, file, line)
            }
            _ => tracing::trace!(target: "client", "{} @ {}[{}:{}]", message, function, file, line),
        }
        true
    })
}
