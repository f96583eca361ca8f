//! Structured logging sink for normalized error records
//!
//! [`TracingLogger`] implements [`error_common::ErrorLogger`] on top of
//! `tracing`: one event per record, at the record's level, with code,
//! status, trace id, timestamp, stack trace, cause chain and details as
//! structured fields. [`init_subscriber`] wires console and file sinks
//! (JSON or human-readable) for services that do not bring their own.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use error_common::{ErrorManager, ManagerConfig};
//! use error_logger::{init_subscriber, LoggerConfig, TracingLogger};
//!
//! # fn main() -> Result<(), error_logger::LoggerError> {
//! let config = LoggerConfig::default();
//! let guard = init_subscriber(&config)?;
//! let logger = TracingLogger::new(&config).with_guard(guard);
//! let manager = ErrorManager::new(ManagerConfig::new(Arc::new(logger)));
//! # let _ = manager;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod subscriber;

pub use config::*;
pub use error::*;
pub use logger::*;
pub use subscriber::*;
