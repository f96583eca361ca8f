use std::any::Any;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Response;
use axum::response::IntoResponse;
use error_common::ErrorManager;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

use crate::body::ErrorBody;
use crate::trace::current_context;

/// Turns a handler panic into a logged fatal record and a 500 response.
#[derive(Clone)]
pub struct PanicResponder {
    manager: Arc<ErrorManager>,
}

impl PanicResponder {
    pub fn new(manager: Arc<ErrorManager>) -> Self {
        Self { manager }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Self::ResponseBody> {
        let record = self.manager.handle_panic(&current_context(), err.as_ref());
        ErrorBody::for_panic(&record).into_response()
    }
}

/// Catches panics below this layer. Put it inside [`trace_layer`](crate::trace_layer)
/// so the panic record gets the request's trace id.
pub fn panic_layer(manager: Arc<ErrorManager>) -> CatchPanicLayer<PanicResponder> {
    CatchPanicLayer::custom(PanicResponder::new(manager))
}
