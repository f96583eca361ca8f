use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use error_common::{AppError, Details, ErrorCode};
use serde::{Deserialize, Serialize};

/// JSON error payload written to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: ErrorCode,
    pub status: u16,
    pub trace_id: Option<String>,
    /// Only present for non-sensitive records with details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

impl ErrorBody {
    pub fn from_record(err: &AppError) -> Self {
        let details = (!err.is_sensitive && !err.details.is_empty()).then(|| err.details.clone());

        Self {
            message: err.safe_message().to_string(),
            code: err.safe_code(),
            status: err.status,
            trace_id: err.trace_id.clone(),
            details,
        }
    }

    /// Body for a recovered panic: always a 500 and never any details.
    pub fn for_panic(err: &AppError) -> Self {
        Self {
            message: err.safe_message().to_string(),
            code: err.safe_code(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            trace_id: err.trace_id.clone(),
            details: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error_common::wrap;
    use serde_json::json;

    #[test]
    fn test_details_only_for_safe_records() {
        let safe = AppError::builder()
            .with_message("Validation failed")
            .with_code(ErrorCode::ValidationError)
            .with_status(400)
            .with_detail("email", "is required")
            .with_sensitive(false)
            .build();
        let body = ErrorBody::from_record(&safe);
        assert_eq!(body.details.as_ref().and_then(|d| d.get("email")), Some(&json!("is required")));

        let secret = AppError::builder()
            .with_message("constraint users_pkey violated")
            .with_code(ErrorCode::DbError)
            .with_detail("table", "users")
            .build();
        let body = ErrorBody::from_record(&secret);
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.code, ErrorCode::InternalError);
        assert!(body.details.is_none());
    }

    #[test]
    fn test_empty_details_are_omitted() {
        let body = ErrorBody::from_record(&wrap::not_found("no such order"));
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["message"], "no such order");
        assert_eq!(value["code"], "NOT_FOUND");
        assert_eq!(value["status"], 404);
        assert!(value["trace_id"].is_null());
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_out_of_range_status_maps_to_500() {
        let err = AppError::builder().with_status(42).with_sensitive(false).build();
        assert_eq!(ErrorBody::from_record(&err).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
