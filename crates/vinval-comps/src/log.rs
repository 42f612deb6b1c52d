//! Injectable diagnostic logging.
//!
//! Pipeline functions report dropped records and degraded selections through
//! an [`EventLog`] rather than writing to a global sink. [`TracingLog`] is the
//! default and forwards every event to `tracing`.

use serde_json::Value;
use tracing::Level;

/// Structured diagnostic sink: `log(level, message, context)`.
pub trait EventLog: Send + Sync {
    fn log(&self, level: Level, message: &str, context: &Value);
}

/// Forwards events to the active `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl EventLog for TracingLog {
    fn log(&self, level: Level, message: &str, context: &Value) {
        match level {
            Level::ERROR => tracing::error!(context = %context, "{message}"),
            Level::WARN => tracing::warn!(context = %context, "{message}"),
            Level::INFO => tracing::info!(context = %context, "{message}"),
            Level::DEBUG => tracing::debug!(context = %context, "{message}"),
            Level::TRACE => tracing::trace!(context = %context, "{message}"),
        }
    }
}
