//! Error framework facade
//!
//! Wires the error manager, the logging sink and the source adapters from
//! one [`FrameworkConfig`] and keeps the result in a process-wide,
//! initialize-once holder. The free functions here are the call sites
//! application code uses after startup.
//!
//! # Example
//!
//! ```rust,no_run
//! use error_common::ErrorContext;
//! use error_framework::{init_from_config, FrameworkConfig};
//!
//! # fn main() -> Result<(), error_framework::FrameworkError> {
//! let config = FrameworkConfig::load(Some("errors.toml".as_ref()))?;
//! let manager = init_from_config(&config)?;
//!
//! let record = error_framework::db(sqlx::Error::RowNotFound)?;
//! let handled = manager.handle(&ErrorContext::new(), record);
//! assert_eq!(handled.status, 404);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod framework;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::framework::*;

pub use error_common::wrap::{
    already_exists, forbidden, internal, invalid_input, not_found, timeout, unauthorized, wrap,
    wrap_safe, wrap_with_code,
};

use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;

use error_common::{AppError, BoxError, ErrorContext, ErrorManager};
use error_logger::{init_subscriber, LoggerError, TracingLogger};

static GLOBAL: FrameworkCell = FrameworkCell::new();

/// Installs `framework` as the process-wide instance. Only the first call
/// has an effect; every call returns the installed instance.
pub fn init(framework: Framework) -> &'static Framework {
    GLOBAL.init(framework)
}

/// # Errors
///
/// [`FrameworkError::NotInitialized`] before [`init`] or
/// [`init_from_config`] has run.
pub fn global() -> Result<&'static Framework> {
    GLOBAL.get()
}

/// Installs the logging subscriber, builds the framework described by
/// `config` and makes it the process-wide instance.
///
/// A `tracing` subscriber installed by the host is reused as is. Once the
/// framework is installed, later calls return its manager without
/// touching logging.
///
/// # Errors
///
/// Fails when the log sinks cannot be created.
pub fn init_from_config(config: &FrameworkConfig) -> Result<Arc<ErrorManager>> {
    if let Ok(installed) = global() {
        return Ok(Arc::clone(installed.manager()));
    }

    let logger = match init_subscriber(&config.logger) {
        Ok(guard) => TracingLogger::new(&config.logger).with_guard(guard),
        Err(LoggerError::SubscriberInit(reason)) => {
            tracing::debug!(%reason, "reusing the installed tracing subscriber");
            TracingLogger::new(&config.logger)
        }
        Err(err) => return Err(err.into()),
    };

    let installed = init(Framework::from_config(config, Arc::new(logger)));
    tracing::info!(
        database = installed.database().is_some(),
        validation = installed.validation().is_some(),
        "error framework initialized"
    );
    Ok(Arc::clone(installed.manager()))
}

/// # Errors
///
/// Fails when the framework is not initialized or has no database adapter.
pub fn db<E>(err: E) -> Result<AppError>
where
    E: Into<BoxError>,
{
    global()?.db(err)
}

/// # Errors
///
/// Fails when the framework is not initialized or has no validation adapter.
pub fn validation(err: &(dyn StdError + 'static)) -> Result<AppError> {
    global()?.validation_error(err)
}

/// # Errors
///
/// [`FrameworkError::NotInitialized`] before initialization.
pub fn handle<E>(ctx: &ErrorContext, err: E) -> Result<AppError>
where
    E: Into<BoxError>,
{
    Ok(global()?.handle(ctx, err))
}

/// Turns a payload caught with `std::panic::catch_unwind` into a logged,
/// fatal record.
///
/// # Errors
///
/// [`FrameworkError::NotInitialized`] before initialization.
pub fn recover(ctx: &ErrorContext, payload: &(dyn Any + Send)) -> Result<AppError> {
    Ok(global()?.recover(ctx, payload))
}

/// Wraps a caught panic payload under `message` without logging it.
pub fn recover_and_wrap(payload: &(dyn Any + Send), message: impl Into<String>) -> AppError {
    wrap(framework::panic_record(payload), message)
}
