//! Convenience constructors for common record shapes.
//!
//! These only build records. They neither enrich nor log; route the result
//! through [`ErrorManager`](crate::manager::ErrorManager) or sanitize it
//! before it leaves the process.

use crate::codes::ErrorCode;
use crate::level::ErrorLevel;
use crate::types::{AppError, BoxError, INTERNAL_ERROR_MESSAGE};

pub fn not_found(message: impl Into<String>) -> AppError {
    AppError::builder()
        .with_message(message)
        .with_code(ErrorCode::NotFound)
        .with_status(404)
        .with_sensitive(false)
        .with_level(ErrorLevel::Info)
        .build()
}

pub fn already_exists(message: impl Into<String>) -> AppError {
    AppError::builder()
        .with_message(message)
        .with_code(ErrorCode::AlreadyExists)
        .with_status(409)
        .with_sensitive(false)
        .with_level(ErrorLevel::Warn)
        .build()
}

pub fn invalid_input(message: impl Into<String>) -> AppError {
    AppError::builder()
        .with_message(message)
        .with_code(ErrorCode::InvalidInput)
        .with_status(400)
        .with_sensitive(false)
        .with_level(ErrorLevel::Warn)
        .build()
}

pub fn unauthorized(message: impl Into<String>) -> AppError {
    AppError::builder()
        .with_message(message)
        .with_code(ErrorCode::Unauthorized)
        .with_status(401)
        .with_sensitive(false)
        .with_level(ErrorLevel::Warn)
        .build()
}

pub fn forbidden(message: impl Into<String>) -> AppError {
    AppError::builder()
        .with_message(message)
        .with_code(ErrorCode::Forbidden)
        .with_status(403)
        .with_sensitive(false)
        .with_level(ErrorLevel::Warn)
        .build()
}

pub fn timeout(message: impl Into<String>) -> AppError {
    AppError::builder()
        .with_message(message)
        .with_code(ErrorCode::Timeout)
        .with_status(504)
        .with_sensitive(false)
        .with_level(ErrorLevel::Error)
        .build()
}

/// Opaque internal error wrapping `err`.
pub fn internal(err: impl Into<BoxError>) -> AppError {
    AppError::builder()
        .with_message(INTERNAL_ERROR_MESSAGE)
        .with_code(ErrorCode::InternalError)
        .with_status(500)
        .with_sensitive(true)
        .with_internal(err)
        .with_level(ErrorLevel::Error)
        .build()
}

/// Adds context to an existing error.
///
/// Wrapping an `AppError` keeps its code, status, details, level and
/// sensitivity; any other error gets the internal-error shape. The input
/// always becomes the new record's cause.
pub fn wrap(err: impl Into<BoxError>, message: impl Into<String>) -> AppError {
    wrap_inner(err.into(), message.into(), None)
}

/// Same as [`wrap`] but always marks the result as safe to show, for
/// messages deliberately written for the client.
pub fn wrap_safe(err: impl Into<BoxError>, message: impl Into<String>) -> AppError {
    wrap_inner(err.into(), message.into(), Some(false))
}

/// Wraps `err` under an explicit code. The result stays sensitive.
pub fn wrap_with_code(err: impl Into<BoxError>, code: ErrorCode, message: impl Into<String>) -> AppError {
    AppError::builder()
        .with_message(message)
        .with_code(code)
        .with_internal(err)
        .with_sensitive(true)
        .build()
}

fn wrap_inner(err: BoxError, message: String, sensitive: Option<bool>) -> AppError {
    match err.downcast::<AppError>() {
        Ok(inner) => {
            let inner = *inner;
            AppError::builder()
                .with_message(message)
                .with_code(inner.code)
                .with_status(inner.status)
                .with_details(inner.details.clone())
                .with_level(inner.level)
                .with_sensitive(sensitive.unwrap_or(inner.is_sensitive))
                .with_internal(inner)
                .build()
        }
        Err(raw) => AppError::builder()
            .with_message(message)
            .with_code(ErrorCode::InternalError)
            .with_status(500)
            .with_level(ErrorLevel::Error)
            .with_sensitive(sensitive.unwrap_or(true))
            .with_internal(raw)
            .build(),
    }
}
