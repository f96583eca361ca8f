// ErrorLogger implementation emitting one tracing event per record
use error_common::{AppError, ErrorLevel, ErrorLogger};
use parking_lot::Mutex;
use tracing::Level;

use crate::config::LoggerConfig;
use crate::subscriber::LoggingGuard;

macro_rules! emit_record {
    ($level:expr, $err:expr, $fatal:expr) => {{
        let err: &AppError = $err;
        let timestamp = err.timestamp.map(|t| t.to_rfc3339()).unwrap_or_default();
        let cause = err.chain_message().unwrap_or_default();
        let details = serde_json::to_string(&err.details).unwrap_or_default();
        tracing::event!(
            target: "error_logger",
            $level,
            code = %err.code,
            status = err.status,
            severity = %err.level,
            fatal = $fatal,
            sensitive = err.is_sensitive,
            trace_id = err.trace_id.as_deref().unwrap_or(""),
            timestamp = %timestamp,
            stacktrace = err.stack_trace.as_deref().unwrap_or(""),
            error = %cause,
            details = %details,
            "{}",
            err.message
        );
    }};
}

/// Routes records into the global `tracing` subscriber.
///
/// Records below the configured minimum level are dropped. With
/// `exit_on_fatal` a fatal record flushes the file sinks and ends the
/// process with exit code 1.
pub struct TracingLogger {
    min_level: ErrorLevel,
    exit_on_fatal: bool,
    guard: Mutex<Option<LoggingGuard>>,
}

impl TracingLogger {
    pub fn new(config: &LoggerConfig) -> Self {
        Self {
            min_level: config.min_level(),
            exit_on_fatal: config.exit_on_fatal,
            guard: Mutex::new(None),
        }
    }

    /// Keeps the subscriber guard so it can be flushed before a fatal exit.
    #[must_use]
    pub fn with_guard(self, guard: LoggingGuard) -> Self {
        *self.guard.lock() = Some(guard);
        self
    }

    pub fn min_level(&self) -> ErrorLevel {
        self.min_level
    }

    /// Whether a record at `level` would be emitted.
    pub fn enabled(&self, level: ErrorLevel) -> bool {
        level >= self.min_level
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(&LoggerConfig::default())
    }
}

impl ErrorLogger for TracingLogger {
    fn log(&self, err: &AppError) {
        if !self.enabled(err.level) {
            return;
        }

        match err.level {
            ErrorLevel::Debug => emit_record!(Level::DEBUG, err, false),
            ErrorLevel::Info => emit_record!(Level::INFO, err, false),
            ErrorLevel::Warn => emit_record!(Level::WARN, err, false),
            ErrorLevel::Error => emit_record!(Level::ERROR, err, false),
            ErrorLevel::Fatal => emit_record!(Level::ERROR, err, true),
        }

        if err.level == ErrorLevel::Fatal && self.exit_on_fatal {
            drop(self.guard.lock().take());
            std::process::exit(1);
        }
    }
}
