//! Common error handling for server applications
//!
//! This crate provides one error shape that application code, HTTP
//! middleware and structured logging all agree on. Errors from any source
//! are normalized into an [`AppError`] carrying a client-safe projection
//! and full server-side diagnostics.
//!
//! # Key Features
//!
//! - **Uniform Record**: message, code, status, details, level, cause chain
//! - **Safe by Default**: records are sensitive until a caller opts out
//! - **Sanitization**: `safe_message` / `safe_code` for client boundaries
//! - **Enrichment**: timestamp, trace id and stack trace filled exactly once
//! - **Pluggable Collaborators**: logger, trace provider, stack capture
//! - **Wrap Helpers**: not-found, already-exists, wrap, wrap-safe
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use error_common::{
//!     wrap, AppError, ErrorCode, ErrorContext, ErrorLogger, ErrorManager, ManagerConfig,
//!     UuidTraceProvider,
//! };
//!
//! struct StdoutLogger;
//!
//! impl ErrorLogger for StdoutLogger {
//!     fn log(&self, err: &AppError) {
//!         println!("[{}] {} {}", err.level, err.code, err);
//!     }
//! }
//!
//! let manager = ErrorManager::new(
//!     ManagerConfig::new(Arc::new(StdoutLogger))
//!         .with_trace_provider(Arc::new(UuidTraceProvider::new())),
//! );
//!
//! let err = wrap::not_found("Patient not found");
//! let handled = manager.handle(&ErrorContext::new(), err);
//!
//! assert_eq!(handled.safe_code(), ErrorCode::NotFound);
//! assert!(handled.trace_id.is_some());
//! ```

pub mod builder;
pub mod codes;
pub mod context;
pub mod level;
pub mod manager;
pub mod providers;
pub mod sanitization;
pub mod stacktrace;
pub mod trace;
pub mod types;
pub mod wrap;

pub use builder::*;
pub use codes::*;
pub use context::*;
pub use level::*;
pub use manager::*;
pub use providers::*;
pub use sanitization::*;
pub use stacktrace::*;
pub use trace::*;
pub use types::*;
