use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// One failing rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field name or dotted path for nested values
    pub field: String,
    /// Rule tag, e.g. `required`, `email`, `gte`, `min`
    pub tag: String,
    pub param: Option<String>,
    /// Message declared alongside the rule, if any
    pub message: Option<String>,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            tag: tag.into(),
            param: None,
            message: None,
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{} failed {}={}", self.field, self.tag, param),
            None => write!(f, "{} failed {}", self.field, self.tag),
        }
    }
}

/// A structured validation failure: the per-field violations of one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed on {} field(s)", .0.len())]
pub struct ValidationFailure(pub Vec<FieldViolation>);

impl ValidationFailure {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self(violations)
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&ValidationErrors> for ValidationFailure {
    fn from(errors: &ValidationErrors) -> Self {
        let mut violations = Vec::new();
        collect(errors, None, &mut violations);
        // validator keeps fields in a hash map
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        Self(violations)
    }
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        Self::from(&errors)
    }
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|err| violation_from(&path, err)));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

fn violation_from(field: &str, err: &ValidationError) -> FieldViolation {
    let (tag, param) = tag_and_param(err);
    FieldViolation {
        field: field.to_string(),
        tag,
        param,
        message: err.message.as_ref().map(ToString::to_string),
    }
}

/// Maps validator's rule codes onto the tag vocabulary used for messages.
///
/// `length` becomes `min`, `max` or `len`; `range` becomes `gte` or `lte`.
/// When both bounds are declared the offending value decides which one
/// was crossed.
fn tag_and_param(err: &ValidationError) -> (String, Option<String>) {
    let param = |key: &str| err.params.get(key);

    match err.code.as_ref() {
        "length" => {
            if let Some(equal) = param("equal") {
                return ("len".to_string(), Some(render(equal)));
            }
            let below_min = |min: &Value| {
                let len = param("value").and_then(value_len);
                match (len, min.as_u64()) {
                    (Some(len), Some(min)) => len < min,
                    _ => true,
                }
            };
            bounded("min", "max", param("min"), param("max"), below_min)
                .unwrap_or_else(|| ("length".to_string(), None))
        }
        "range" => {
            let below_min = |min: &Value| match (param("value").and_then(Value::as_f64), min.as_f64()) {
                (Some(value), Some(min)) => value < min,
                _ => true,
            };
            bounded("gte", "lte", param("min"), param("max"), below_min)
                .unwrap_or_else(|| ("range".to_string(), None))
        }
        other => (other.to_string(), None),
    }
}

fn bounded(
    min_tag: &str,
    max_tag: &str,
    min: Option<&Value>,
    max: Option<&Value>,
    below_min: impl Fn(&Value) -> bool,
) -> Option<(String, Option<String>)> {
    match (min, max) {
        (Some(min), Some(max)) => {
            if below_min(min) {
                Some((min_tag.to_string(), Some(render(min))))
            } else {
                Some((max_tag.to_string(), Some(render(max))))
            }
        }
        (Some(min), None) => Some((min_tag.to_string(), Some(render(min)))),
        (None, Some(max)) => Some((max_tag.to_string(), Some(render(max)))),
        (None, None) => None,
    }
}

fn value_len(value: &Value) -> Option<u64> {
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => return None,
    };
    u64::try_from(len).ok()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds a violation directly from a validator error, for callers that
/// run individual validator functions instead of the derive.
pub fn violation(field: &str, err: &ValidationError) -> FieldViolation {
    violation_from(field, err)
}
