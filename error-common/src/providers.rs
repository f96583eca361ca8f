// Collaborator contracts consumed by the error manager
// Implementations are injected once and shared across requests.

use crate::context::ErrorContext;
use crate::types::AppError;

/// Sink that receives every handled record.
///
/// A fatal record may terminate the process if the implementation says so;
/// the manager does not guard against that.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorLogger: Send + Sync {
    fn log(&self, err: &AppError);
}

/// Supplies the correlation id for a record.
///
/// Must always return a non-empty id, generating one when the context has none.
#[cfg_attr(test, mockall::automock)]
pub trait TraceProvider: Send + Sync {
    fn trace_id(&self, ctx: &ErrorContext) -> String;
}

/// Captures a human readable call stack with its own frames elided.
#[cfg_attr(test, mockall::automock)]
pub trait StackTraceProvider: Send + Sync {
    fn capture(&self) -> String;
}
