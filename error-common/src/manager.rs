// Error manager
// Single funnel every error passes through before it is observed externally.

use chrono::Utc;
use std::any::Any;
use std::panic::{self, UnwindSafe};
use std::sync::Arc;

use crate::codes::ErrorCode;
use crate::context::ErrorContext;
use crate::level::ErrorLevel;
use crate::providers::{ErrorLogger, StackTraceProvider, TraceProvider};
use crate::sanitization::ErrorResponse;
use crate::types::{AppError, BoxError, INTERNAL_ERROR_MESSAGE};

/// Detail key holding the payload of a recovered panic.
pub const PANIC_DETAIL_KEY: &str = "panic";

/// Collaborators for [`ErrorManager`].
///
/// The logger is mandatory and has no default, so a manager without a sink
/// cannot be built.
#[derive(Clone)]
pub struct ManagerConfig {
    pub logger: Arc<dyn ErrorLogger>,
    pub trace_provider: Option<Arc<dyn TraceProvider>>,
    pub stack_trace_provider: Option<Arc<dyn StackTraceProvider>>,
}

impl ManagerConfig {
    pub fn new(logger: Arc<dyn ErrorLogger>) -> Self {
        Self {
            logger,
            trace_provider: None,
            stack_trace_provider: None,
        }
    }

    #[must_use]
    pub fn with_trace_provider(mut self, provider: Arc<dyn TraceProvider>) -> Self {
        self.trace_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn with_stack_trace_provider(mut self, provider: Arc<dyn StackTraceProvider>) -> Self {
        self.stack_trace_provider = Some(provider);
        self
    }
}

/// Normalizes, enriches and logs errors.
///
/// Holds only shared read-only collaborators, so one instance can serve
/// any number of concurrent requests.
pub struct ErrorManager {
    logger: Arc<dyn ErrorLogger>,
    trace_provider: Option<Arc<dyn TraceProvider>>,
    stack_trace_provider: Option<Arc<dyn StackTraceProvider>>,
}

impl ErrorManager {
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            logger: config.logger,
            trace_provider: config.trace_provider,
            stack_trace_provider: config.stack_trace_provider,
        }
    }

    /// Normalizes `err` into an enriched, logged record.
    ///
    /// An `AppError`, at the top or anywhere in the source chain, keeps its
    /// message, code, status and details; any other error becomes an opaque
    /// internal error wrapping it.
    pub fn handle<E>(&self, ctx: &ErrorContext, err: E) -> AppError
    where
        E: Into<BoxError>,
    {
        let err = match AppError::from_chain(err.into()) {
            Ok(app_err) => app_err,
            Err(raw) => AppError::builder()
                .with_message(INTERNAL_ERROR_MESSAGE)
                .with_code(ErrorCode::InternalError)
                .with_status(500)
                .with_level(ErrorLevel::Error)
                .with_sensitive(true)
                .with_internal(raw)
                .build(),
        };

        self.report(ctx, err)
    }

    /// Like [`handle`](Self::handle) for an error that may be absent.
    /// `None` is returned untouched and nothing is logged.
    pub fn handle_opt<E>(&self, ctx: &ErrorContext, err: Option<E>) -> Option<AppError>
    where
        E: Into<BoxError>,
    {
        err.map(|e| self.handle(ctx, e))
    }

    /// Routes the error side of `result` through [`handle`](Self::handle).
    ///
    /// # Errors
    ///
    /// Returns the handled record when `result` is `Err`.
    pub fn handle_result<T, E>(&self, ctx: &ErrorContext, result: Result<T, E>) -> Result<T, AppError>
    where
        E: Into<BoxError>,
    {
        result.map_err(|e| self.handle(ctx, e))
    }

    /// Fills the timestamp, trace id and stack trace when they are unset.
    ///
    /// Fields that already hold a value are never overwritten, so repeated
    /// or nested handling leaves the first enrichment in place.
    pub fn enrich(&self, ctx: &ErrorContext, err: &mut AppError) {
        if err.timestamp.is_none() {
            err.timestamp = Some(Utc::now());
        }

        if let Some(provider) = &self.trace_provider {
            if err.trace_id.as_deref().map_or(true, str::is_empty) {
                err.trace_id = Some(provider.trace_id(ctx));
            }
        }

        if let Some(provider) = &self.stack_trace_provider {
            if err.stack_trace.as_deref().map_or(true, str::is_empty) {
                err.stack_trace = Some(provider.capture());
            }
        }
    }

    /// Handles `err` and returns only the client-safe projection.
    pub fn to_response<E>(&self, ctx: &ErrorContext, err: E) -> ErrorResponse
    where
        E: Into<BoxError>,
    {
        let app_err = self.handle(ctx, err);
        ErrorResponse::from_error(&app_err)
    }

    /// Converts a recovered panic payload into a fatal, sensitive record.
    pub fn handle_panic(&self, ctx: &ErrorContext, payload: &(dyn Any + Send)) -> AppError {
        let err = AppError::builder()
            .with_message(INTERNAL_ERROR_MESSAGE)
            .with_code(ErrorCode::InternalError)
            .with_status(500)
            .with_level(ErrorLevel::Fatal)
            .with_sensitive(true)
            .with_detail(PANIC_DETAIL_KEY, panic_message(payload))
            .build();

        self.report(ctx, err)
    }

    /// Wraps `err` in a sensitive internal error carrying `message`.
    pub fn wrap<E>(&self, ctx: &ErrorContext, err: E, message: impl Into<String>) -> AppError
    where
        E: Into<BoxError>,
    {
        let err = AppError::builder()
            .with_message(message)
            .with_code(ErrorCode::InternalError)
            .with_status(500)
            .with_sensitive(true)
            .with_internal(err)
            .build();

        self.report(ctx, err)
    }

    /// Runs `f`, turning a panic into a handled record.
    ///
    /// # Errors
    ///
    /// Returns the record produced by [`handle_panic`](Self::handle_panic)
    /// when `f` unwinds.
    pub fn catch_unwind<F, T>(&self, ctx: &ErrorContext, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> T + UnwindSafe,
    {
        panic::catch_unwind(f).map_err(|payload| self.handle_panic(ctx, payload.as_ref()))
    }

    fn report(&self, ctx: &ErrorContext, mut err: AppError) -> AppError {
        self.enrich(ctx, &mut err);

        tracing::debug!(
            code = %err.code,
            status = err.status,
            level = %err.level,
            trace_id = err.trace_id.as_deref().unwrap_or(""),
            "error handled"
        );
        self.logger.log(&err);

        err
    }
}

/// Extracts the text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(err) = payload.downcast_ref::<AppError>() {
        err.message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
