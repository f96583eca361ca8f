use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::error::Error as StdError;
use thiserror::Error;

use crate::builder::ErrorBuilder;
use crate::codes::ErrorCode;
use crate::level::ErrorLevel;

/// Owned, type-erased error used for the causal chain.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Structured supplementary data attached to a record.
pub type Details = HashMap<String, serde_json::Value>;

/// Client-facing message used whenever a record is sensitive.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// The uniform error record shared by application code, middleware and logging.
///
/// Construct it through [`AppError::builder`]; the defaults are the opaque
/// internal-error shape, so nothing reaches a client until a caller opts in
/// with `with_sensitive(false)`.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct AppError {
    /// Human readable description, may carry internal detail
    pub message: String,
    pub code: ErrorCode,
    /// HTTP-shaped status hint
    pub status: u16,
    pub details: Details,
    pub level: ErrorLevel,
    /// Underlying error, never exposed to clients
    #[source]
    pub source: Option<BoxError>,
    pub is_sensitive: bool,
    /// Set once on first enrichment
    pub timestamp: Option<DateTime<Utc>>,
    pub stack_trace: Option<String>,
    pub trace_id: Option<String>,
}

impl AppError {
    pub fn builder() -> ErrorBuilder {
        ErrorBuilder::new()
    }

    /// Message safe to show to a client.
    pub fn safe_message(&self) -> &str {
        if self.is_sensitive {
            INTERNAL_ERROR_MESSAGE
        } else {
            &self.message
        }
    }

    /// Code safe to show to a client.
    pub fn safe_code(&self) -> ErrorCode {
        if self.is_sensitive {
            ErrorCode::InternalError
        } else {
            self.code
        }
    }

    /// The wrapped cause, if any.
    pub fn internal(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Walks the causal chain starting at the direct cause.
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            next: self.source.as_deref().map(|e| e as &(dyn StdError + 'static)),
        }
    }

    /// The deepest error in the chain, or `self` when nothing is wrapped.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        self.chain().last().unwrap_or(self)
    }

    /// Returns the wrapped cause as an `AppError` when it is one.
    pub fn inner_app_error(&self) -> Option<&AppError> {
        self.source.as_deref().and_then(|e| e.downcast_ref::<AppError>())
    }

    /// Finds the outermost record in `err` or anywhere in its source chain.
    pub fn find_in<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a AppError> {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(record) = e.downcast_ref::<AppError>() {
                return Some(record);
            }
            current = e.source();
        }
        None
    }

    /// Recovers a record from a type-erased error.
    ///
    /// A top-level record is unboxed as is. A record buried in the chain,
    /// e.g. under an `anyhow` context, has its shape copied onto a new
    /// record whose cause is the whole of `err`. Without any record the
    /// error is handed back untouched.
    ///
    /// # Errors
    ///
    /// Returns `err` when its chain holds no record.
    pub fn from_chain(err: BoxError) -> std::result::Result<AppError, BoxError> {
        let err = match err.downcast::<AppError>() {
            Ok(record) => return Ok(*record),
            Err(err) => err,
        };

        let Some(found) = AppError::find_in(err.as_ref()) else {
            return Err(err);
        };
        let shape = AppError {
            message: found.message.clone(),
            code: found.code,
            status: found.status,
            details: found.details.clone(),
            level: found.level,
            source: None,
            is_sensitive: found.is_sensitive,
            timestamp: found.timestamp,
            stack_trace: found.stack_trace.clone(),
            trace_id: found.trace_id.clone(),
        };

        Ok(AppError {
            source: Some(err),
            ..shape
        })
    }

    /// Renders the cause chain as `a: b: c` for diagnostics.
    pub fn chain_message(&self) -> Option<String> {
        let parts: Vec<String> = self.chain().map(ToString::to_string).collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(": "))
        }
    }
}

/// Iterator over an error's sources.
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Result type alias for operations returning a record
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_display_is_message() {
        let err = AppError::builder().with_message("test error").build();
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_source_returns_internal_cause() {
        let original = io::Error::new(io::ErrorKind::Other, "original");
        let err = AppError::builder().with_internal(original).build();

        let source = StdError::source(&err).unwrap();
        assert_eq!(source.to_string(), "original");
        assert_eq!(err.internal().unwrap().to_string(), "original");
    }

    #[test]
    fn test_safe_message_hides_sensitive_message() {
        let err = AppError::builder()
            .with_message("secret")
            .with_code(ErrorCode::DbError)
            .with_sensitive(true)
            .build();

        assert_eq!(err.safe_message(), INTERNAL_ERROR_MESSAGE);
        assert_eq!(err.safe_code(), ErrorCode::InternalError);
    }

    #[test]
    fn test_safe_message_passes_through_when_not_sensitive() {
        let err = AppError::builder()
            .with_message("visible")
            .with_code(ErrorCode::NotFound)
            .with_sensitive(false)
            .build();

        assert_eq!(err.safe_message(), "visible");
        assert_eq!(err.safe_code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_sensitivity_is_read_at_call_time() {
        let mut err = AppError::builder().with_message("visible").with_sensitive(false).build();
        assert_eq!(err.safe_message(), "visible");

        err.is_sensitive = true;
        assert_eq!(err.safe_message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_chain_walks_nested_records() {
        let root = io::Error::new(io::ErrorKind::NotFound, "disk gone");
        let inner = AppError::builder().with_message("load failed").with_internal(root).build();
        let outer = AppError::builder().with_message("request failed").with_internal(inner).build();

        let messages: Vec<String> = outer.chain().map(ToString::to_string).collect();
        assert_eq!(messages, vec!["load failed", "disk gone"]);
        assert_eq!(outer.root_cause().to_string(), "disk gone");
        assert_eq!(outer.inner_app_error().unwrap().message, "load failed");
        assert_eq!(outer.chain_message().as_deref(), Some("load failed: disk gone"));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("loading chart")]
    struct Context(#[source] AppError);

    #[test]
    fn test_from_chain_finds_buried_record() {
        let inner = AppError::builder()
            .with_message("chart missing")
            .with_code(ErrorCode::NotFound)
            .with_status(404)
            .with_level(crate::ErrorLevel::Info)
            .with_detail("chart", 7)
            .with_sensitive(false)
            .build();
        let boxed: BoxError = Box::new(Context(inner));

        let record = AppError::from_chain(boxed).unwrap();
        assert_eq!(record.message, "chart missing");
        assert_eq!(record.code, ErrorCode::NotFound);
        assert_eq!(record.status, 404);
        assert_eq!(record.level, crate::ErrorLevel::Info);
        assert!(!record.is_sensitive);
        assert_eq!(record.details.get("chart"), Some(&serde_json::json!(7)));
        // the wrapper stays reachable as the cause
        assert_eq!(record.internal().unwrap().to_string(), "loading chart");
        assert!(record.inner_app_error().is_none());
        assert_eq!(record.chain().nth(1).unwrap().to_string(), "chart missing");
    }

    #[test]
    fn test_from_chain_hands_back_foreign_errors() {
        let boxed: BoxError = Box::new(io::Error::new(io::ErrorKind::Other, "plain"));
        let err = AppError::from_chain(boxed).unwrap_err();
        assert_eq!(err.to_string(), "plain");
    }

    #[test]
    fn test_root_cause_of_unwrapped_record_is_itself() {
        let err = AppError::builder().with_message("alone").build();
        assert_eq!(err.root_cause().to_string(), "alone");
        assert!(err.chain_message().is_none());
    }
}
