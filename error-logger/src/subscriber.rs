// Global subscriber setup for console and file sinks
use std::fs::{self, OpenOptions};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::{LogEncoding, LoggerConfig};
use crate::error::{LoggerError, Result};

pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the non-blocking file writer alive. Dropping it flushes pending lines.
#[derive(Debug, Default)]
pub struct LoggingGuard {
    guards: Vec<WorkerGuard>,
}

impl LoggingGuard {
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

/// Builds the sink layers described by `config` without installing them.
///
/// # Errors
///
/// Fails when file logging is enabled without a path or the file cannot
/// be opened for appending.
pub fn build_layers(config: &LoggerConfig) -> Result<(Vec<BoxedLayer>, LoggingGuard)> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = LoggingGuard::default();

    if config.console_enabled {
        let layer: BoxedLayer = match config.encoding {
            LogEncoding::Json => fmt::layer().json().with_writer(std::io::stdout).boxed(),
            LogEncoding::Console => fmt::layer().with_writer(std::io::stdout).boxed(),
        };
        layers.push(layer);
    }

    if config.file_enabled {
        let path = config.file_path.as_ref().ok_or(LoggerError::MissingFilePath)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LoggerError::FileOpen {
                path: path.clone(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggerError::FileOpen {
                path: path.clone(),
                source,
            })?;

        let (writer, worker) = tracing_appender::non_blocking(file);
        guard.guards.push(worker);

        let layer: BoxedLayer = match config.encoding {
            LogEncoding::Json => fmt::layer().json().with_ansi(false).with_writer(writer).boxed(),
            LogEncoding::Console => fmt::layer().with_ansi(false).with_writer(writer).boxed(),
        };
        layers.push(layer);
    }

    Ok((layers, guard))
}

/// Installs the global `tracing` subscriber for `config`.
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// # Errors
///
/// Returns an error when a sink cannot be created or a global subscriber
/// is already installed.
pub fn init_subscriber(config: &LoggerConfig) -> Result<LoggingGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.filter_directive())
            .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?,
    };

    let (layers, guard) = build_layers(config)?;

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::SubscriberInit(e.to_string()))?;

    Ok(guard)
}
