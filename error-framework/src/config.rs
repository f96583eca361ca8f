// Framework configuration
use ::config::{Config, Environment, File};
use error_logger::LoggerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Prefix for environment overrides, e.g. `ERRFW__LOGGER__LEVEL=debug`.
pub const ENV_PREFIX: &str = "ERRFW";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    pub logger: LoggerConfig,
    pub trace: TraceConfig,
    pub stack_trace: StackTraceConfig,
    pub database: DatabaseConfig,
    pub validator: ValidatorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub enabled: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackTraceConfig {
    pub enabled: bool,
    pub max_depth: usize,
}

impl Default for StackTraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_depth: error_common::DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[serde(alias = "pgx", alias = "postgresql")]
    Postgres,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub kind: DatabaseKind,
    pub include_constraint_details: bool,
    pub include_table_details: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: DatabaseKind::None,
            include_constraint_details: true,
            include_table_details: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub enabled: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl FrameworkConfig {
    /// Loads configuration from an optional file plus `ERRFW__*`
    /// environment variables. Environment values win over the file.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be parsed, or a value has the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        tracing::debug!(
            database = ?loaded.database.kind,
            validator = loaded.validator.enabled,
            trace = loaded.trace.enabled,
            "error framework configuration loaded"
        );
        Ok(loaded)
    }
}
