//! Bootstrap logging.
//!
//! Framework output always goes through `tracing`. Applications can
//! additionally supply a sink function via [`BootstrapOptions::logger`] to
//! capture the same messages, and silence informational output with
//! `verbose: false`. Warnings and errors are never gated by `verbose`.
//!
//! [`BootstrapOptions::logger`]: crate::factory::BootstrapOptions

use std::fmt;
use std::sync::Arc;

/// Severity passed to a caller-supplied log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Sink function receiving every framework log line.
pub type LogSink = Arc<dyn Fn(LogLevel, &str) + Send + Sync>;

/// Logger used by the orchestrator, the error interceptor and the
/// shutdown coordinator.
#[derive(Clone)]
pub struct Logger {
    verbose: bool,
    sink: Option<LogSink>,
}

impl Logger {
    pub fn new(verbose: bool, sink: Option<LogSink>) -> Self {
        Self { verbose, sink }
    }

    pub fn info(&self, message: &str) {
        if !self.verbose {
            return;
        }
        tracing::info!("{}", message);
        if let Some(sink) = &self.sink {
            sink(LogLevel::Info, message);
        }
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
        if let Some(sink) = &self.sink {
            sink(LogLevel::Warn, message);
        }
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}", message);
        if let Some(sink) = &self.sink {
            sink(LogLevel::Error, message);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(true, None)
    }
}
