//! axum integration
//!
//! - [`trace_layer`] gives every request an [`ErrorContext`](error_common::ErrorContext)
//!   with a trace id and echoes it as `X-Trace-ID`.
//! - [`ApiError`] is the handler error type; [`error_layer`] routes it
//!   through the manager and writes an [`ErrorBody`].
//! - [`panic_layer`] converts handler panics into fatal records.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{routing::get, Router};
//! use error_common::{wrap, ErrorManager};
//! use http_adapter::{error_layer, panic_layer, trace_layer, ApiError};
//!
//! async fn show_invoice() -> Result<&'static str, ApiError> {
//!     Err(wrap::not_found("Invoice not found").into())
//! }
//!
//! fn router(manager: Arc<ErrorManager>) -> Router {
//!     Router::new()
//!         .route("/invoices/:id", get(show_invoice))
//!         .layer(panic_layer(manager.clone()))
//!         .layer(error_layer(manager))
//!         .layer(trace_layer())
//! }
//! ```

pub mod body;
pub mod error;
pub mod layer;
pub mod panic;
pub mod trace;

pub use body::*;
pub use error::*;
pub use layer::*;
pub use panic::*;
pub use trace::*;
