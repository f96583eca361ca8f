//! Trace id propagation for incoming requests.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, Response};
use error_common::ErrorContext;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use uuid::Uuid;

pub const X_TRACE_ID: HeaderName = HeaderName::from_static("x-trace-id");
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub const TRACEPARENT: HeaderName = HeaderName::from_static("traceparent");

tokio::task_local! {
    static REQUEST_CONTEXT: ErrorContext;
}

/// Context of the request being served on the current task, or an empty
/// one outside [`TraceLayer`].
pub fn current_context() -> ErrorContext {
    REQUEST_CONTEXT
        .try_with(ErrorContext::clone)
        .unwrap_or_default()
}

/// Picks the trace id for a request: `X-Trace-ID`, then `X-Request-ID`,
/// then the trace id of a W3C `traceparent`, else a fresh UUID v4.
pub fn extract_trace_id(headers: &HeaderMap) -> String {
    header_str(headers, &X_TRACE_ID)
        .or_else(|| header_str(headers, &X_REQUEST_ID))
        .map(str::to_owned)
        .or_else(|| header_str(headers, &TRACEPARENT).map(traceparent_id))
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Builds the error context for a request from its headers.
pub fn context_from_headers(headers: &HeaderMap) -> ErrorContext {
    let mut ctx = ErrorContext::new().with_trace_id(extract_trace_id(headers));
    if let Some(request_id) = header_str(headers, &X_REQUEST_ID) {
        ctx = ctx.with_request_id(request_id);
    }
    ctx
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// `version-traceid-spanid-flags`; anything else is used verbatim.
fn traceparent_id(value: &str) -> String {
    let mut parts = value.split('-');
    match (parts.next(), parts.next()) {
        (Some(version), Some(trace_id))
            if version.len() == 2 && trace_id.len() == 32 && trace_id.bytes().all(|b| b.is_ascii_hexdigit()) =>
        {
            trace_id.to_string()
        }
        _ => value.to_string(),
    }
}

/// Layer that attaches an [`ErrorContext`] to every request and echoes the
/// trace id in the `X-Trace-ID` response header.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceLayer;

pub fn trace_layer() -> TraceLayer {
    TraceLayer
}

impl<S> Layer<S> for TraceLayer {
    type Service = TraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct TraceService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TraceService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let ctx = context_from_headers(req.headers());
        let header = ctx
            .trace_id()
            .and_then(|trace_id| HeaderValue::from_str(trace_id).ok());
        req.extensions_mut().insert(ctx.clone());

        // the readied service handles this request; the clone waits for the next
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(REQUEST_CONTEXT.scope(ctx, async move {
            let mut response = inner.call(req).await?;
            if let Some(value) = header {
                response.headers_mut().insert(X_TRACE_ID, value);
            }
            Ok(response)
        }))
    }
}
