use std::collections::HashMap;
use std::error::Error as StdError;

use error_common::{AppError, Details, ErrorCode, ErrorLevel};
use serde_json::Value;
use validator::ValidationErrors;

use crate::messages::default_message;
use crate::naming::to_snake_case;
use crate::violation::{FieldViolation, ValidationFailure};

pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Turns validation failures into a single field-keyed `AppError`.
///
/// Messages resolve in this order: a `field.tag` override, a tag override,
/// the message declared on the rule itself, then the built-in default.
#[derive(Debug, Clone, Default)]
pub struct ValidationAdapter {
    messages: HashMap<String, String>,
}

impl ValidationAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_message(&mut self, tag: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(tag.into(), message.into());
    }

    /// `field` is matched after snake-casing, so `FirstName` and
    /// `first_name` register the same override.
    pub fn register_field_message(
        &mut self,
        field: &str,
        tag: &str,
        message: impl Into<String>,
    ) {
        self.messages
            .insert(field_key(&to_snake_case(field), tag), message.into());
    }

    #[must_use]
    pub fn with_message(mut self, tag: impl Into<String>, message: impl Into<String>) -> Self {
        self.register_message(tag, message);
        self
    }

    #[must_use]
    pub fn with_field_message(mut self, field: &str, tag: &str, message: impl Into<String>) -> Self {
        self.register_field_message(field, tag, message);
        self
    }

    pub fn message_for(&self, violation: &FieldViolation) -> String {
        let field = to_snake_case(&violation.field);

        self.messages
            .get(&field_key(&field, &violation.tag))
            .or_else(|| self.messages.get(&violation.tag))
            .cloned()
            .or_else(|| violation.message.clone())
            .unwrap_or_else(|| default_message(&violation.tag, violation.param.as_deref()))
    }

    pub fn from_failure(&self, failure: &ValidationFailure) -> AppError {
        let mut details = Details::new();
        for violation in failure.violations() {
            // a later rule on the same field replaces the earlier message
            details.insert(
                to_snake_case(&violation.field),
                Value::String(self.message_for(violation)),
            );
        }

        tracing::debug!(fields = details.len(), "validation failure mapped");

        AppError::builder()
            .with_message(VALIDATION_FAILED_MESSAGE)
            .with_code(ErrorCode::ValidationError)
            .with_status(400)
            .with_details(details)
            .with_level(ErrorLevel::Warn)
            .with_sensitive(false)
            .build()
    }

    pub fn from_validation_errors(&self, errors: &ValidationErrors) -> AppError {
        self.from_failure(&ValidationFailure::from(errors))
    }

    /// Accepts any error. Values that are not a recognized validation
    /// failure produce a generic record without details.
    pub fn from_error(&self, err: &(dyn StdError + 'static)) -> AppError {
        if let Some(failure) = err.downcast_ref::<ValidationFailure>() {
            return self.from_failure(failure);
        }
        if let Some(errors) = err.downcast_ref::<ValidationErrors>() {
            return self.from_validation_errors(errors);
        }
        generic_failure()
    }
}

fn field_key(field: &str, tag: &str) -> String {
    format!("{field}.{tag}")
}

fn generic_failure() -> AppError {
    AppError::builder()
        .with_message(VALIDATION_FAILED_MESSAGE)
        .with_code(ErrorCode::ValidationError)
        .with_status(400)
        .with_sensitive(false)
        .build()
}
