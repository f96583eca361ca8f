use std::error::Error as StdError;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use error_common::{wrap, AppError};
use parking_lot::Mutex;

use crate::body::ErrorBody;

/// Handler error type.
///
/// Any error converts into it with `?`; records keep their shape, also
/// when wrapped by another error, and
/// everything else becomes an opaque internal error. The response it
/// produces carries the record to [`ErrorLayer`](crate::ErrorLayer), which
/// handles and logs it before the body is written.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn record(&self) -> &AppError {
        &self.0
    }

    pub fn into_record(self) -> AppError {
        self.0
    }
}

impl<E> From<E> for ApiError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        match AppError::from_chain(Box::new(err)) {
            Ok(record) => Self(record),
            Err(raw) => Self(wrap::internal(raw)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // rendered as-is when no ErrorLayer picks it up
        let mut response = ErrorBody::from_record(&self.0).into_response();
        response.extensions_mut().insert(Unhandled::new(self.0));
        response
    }
}

/// Response extension holding a record that has not been through the
/// manager yet.
#[derive(Debug, Clone)]
pub struct Unhandled(Arc<Mutex<Option<AppError>>>);

impl Unhandled {
    pub fn new(err: AppError) -> Self {
        Self(Arc::new(Mutex::new(Some(err))))
    }

    pub fn take(&self) -> Option<AppError> {
        self.0.lock().take()
    }
}
