use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::Request;
use axum::response::{IntoResponse, Response};
use error_common::{ErrorContext, ErrorManager};
use tower::{Layer, Service};

use crate::body::ErrorBody;
use crate::error::Unhandled;
use crate::trace::current_context;

/// Layer that routes [`ApiError`](crate::ApiError) responses through the
/// error manager and rewrites them with the handled record.
#[derive(Clone)]
pub struct ErrorLayer {
    manager: Arc<ErrorManager>,
}

impl ErrorLayer {
    pub fn new(manager: Arc<ErrorManager>) -> Self {
        Self { manager }
    }
}

pub fn error_layer(manager: Arc<ErrorManager>) -> ErrorLayer {
    ErrorLayer::new(manager)
}

impl<S> Layer<S> for ErrorLayer {
    type Service = ErrorService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorService {
            inner,
            manager: Arc::clone(&self.manager),
        }
    }
}

#[derive(Clone)]
pub struct ErrorService<S> {
    inner: S,
    manager: Arc<ErrorManager>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for ErrorService<S>
where
    S: Service<Request<ReqBody>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let ctx = req
            .extensions()
            .get::<ErrorContext>()
            .cloned()
            .unwrap_or_else(current_context);
        let manager = Arc::clone(&self.manager);

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let response = inner.call(req).await?;
            Ok(render_unhandled(&manager, &ctx, response))
        })
    }
}

/// Handles the record carried by `response`, if any, and renders it.
/// Responses without a pending record pass through untouched.
pub fn render_unhandled(manager: &ErrorManager, ctx: &ErrorContext, mut response: Response) -> Response {
    let Some(record) = response
        .extensions_mut()
        .remove::<Unhandled>()
        .and_then(|unhandled| unhandled.take())
    else {
        return response;
    };

    let handled = manager.handle(ctx, record);
    tracing::debug!(code = %handled.code, status = handled.status, "api error rendered");
    ErrorBody::from_record(&handled).into_response()
}
