// Client-safe projection of a record
// Built fresh at every boundary emission; nothing here is cached on the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codes::ErrorCode;
use crate::types::AppError;

/// Reduced view of a record for external consumers.
///
/// Details, the wrapped cause and the stack trace are never part of it,
/// whatever the sensitivity of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: ErrorCode,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ErrorResponse {
    pub fn from_error(err: &AppError) -> Self {
        Self {
            message: err.safe_message().to_string(),
            code: err.safe_code(),
            status: err.status,
            trace_id: err.trace_id.clone(),
            timestamp: err.timestamp,
        }
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self::from_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::INTERNAL_ERROR_MESSAGE;
    use proptest::prelude::*;

    fn any_code() -> impl Strategy<Value = ErrorCode> {
        prop::sample::select(ErrorCode::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn sensitive_records_never_reveal_message_or_code(message in ".*", code in any_code(), status in 100u16..600) {
            let err = AppError::builder()
                .with_message(message)
                .with_code(code)
                .with_status(status)
                .with_sensitive(true)
                .build();

            prop_assert_eq!(err.safe_message(), INTERNAL_ERROR_MESSAGE);
            prop_assert_eq!(err.safe_code(), ErrorCode::InternalError);

            let response = ErrorResponse::from_error(&err);
            prop_assert_eq!(response.message, INTERNAL_ERROR_MESSAGE);
            prop_assert_eq!(response.code, ErrorCode::InternalError);
            prop_assert_eq!(response.status, status);
        }

        #[test]
        fn public_records_pass_message_and_code_through(message in ".*", code in any_code()) {
            let err = AppError::builder()
                .with_message(message.clone())
                .with_code(code)
                .with_sensitive(false)
                .build();

            prop_assert_eq!(err.safe_message(), message.as_str());
            prop_assert_eq!(err.safe_code(), code);
        }
    }

    #[test]
    fn test_response_omits_details_even_when_public() {
        let err = AppError::builder()
            .with_message("Validation failed")
            .with_code(ErrorCode::ValidationError)
            .with_status(400)
            .with_detail("email", "is required")
            .with_stack_trace("frame")
            .with_sensitive(false)
            .build();

        let json = serde_json::to_value(ErrorResponse::from_error(&err)).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.get("message").unwrap(), "Validation failed");
        assert_eq!(object.get("code").unwrap(), "VALIDATION_ERROR");
        assert_eq!(object.get("status").unwrap(), 400);
        assert!(!object.contains_key("details"));
        assert!(!object.contains_key("stack_trace"));
    }
}
