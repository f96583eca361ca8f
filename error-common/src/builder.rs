use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::codes::ErrorCode;
use crate::level::ErrorLevel;
use crate::types::{AppError, BoxError, Details, INTERNAL_ERROR_MESSAGE};

/// Fluent constructor for [`AppError`].
///
/// Starts from the safe baseline: internal-error code, status 500, level
/// error, sensitive, empty details and no timestamp. Every setter replaces
/// exactly one field and nothing is validated.
#[derive(Debug)]
#[must_use]
pub struct ErrorBuilder {
    err: AppError,
}

impl ErrorBuilder {
    pub fn new() -> Self {
        Self {
            err: AppError {
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                code: ErrorCode::InternalError,
                status: 500,
                details: HashMap::new(),
                level: ErrorLevel::Error,
                source: None,
                is_sensitive: true,
                timestamp: None,
                stack_trace: None,
                trace_id: None,
            },
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.err.message = message.into();
        self
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.err.code = code;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.err.status = status;
        self
    }

    /// Replaces the whole details map.
    pub fn with_details(mut self, details: Details) -> Self {
        self.err.details = details;
        self
    }

    /// Inserts one detail entry. Values that cannot be serialized are stored
    /// as their error text so the entry is never silently dropped.
    pub fn with_detail<V: Serialize>(mut self, key: impl Into<String>, value: V) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| serde_json::Value::String(format!("<unserializable: {e}>")));
        self.err.details.insert(key.into(), value);
        self
    }

    pub fn with_level(mut self, level: ErrorLevel) -> Self {
        self.err.level = level;
        self
    }

    /// Sets the wrapped cause.
    pub fn with_internal(mut self, err: impl Into<BoxError>) -> Self {
        self.err.source = Some(err.into());
        self
    }

    pub fn with_sensitive(mut self, sensitive: bool) -> Self {
        self.err.is_sensitive = sensitive;
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.err.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_stack_trace(mut self, stack: impl Into<String>) -> Self {
        self.err.stack_trace = Some(stack.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.err.timestamp = Some(timestamp);
        self
    }

    pub fn build(self) -> AppError {
        self.err
    }
}

impl Default for ErrorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
