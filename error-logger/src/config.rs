// Logger configuration
use error_common::ErrorLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogEncoding {
    #[default]
    Json,
    Console,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub console_enabled: bool,
    pub file_enabled: bool,
    pub file_path: Option<PathBuf>,
    /// debug, info, warn, error or fatal; anything else means error
    pub level: String,
    pub encoding: LogEncoding,
    /// Terminate the process after logging a fatal record
    pub exit_on_fatal: bool,
}

impl LoggerConfig {
    pub fn min_level(&self) -> ErrorLevel {
        ErrorLevel::parse_lenient(&self.level)
    }

    /// `tracing` filter directive for the configured level. Fatal records
    /// are emitted at `ERROR`, so `fatal` filters like `error`.
    pub fn filter_directive(&self) -> &'static str {
        match self.min_level() {
            ErrorLevel::Debug => "debug",
            ErrorLevel::Info => "info",
            ErrorLevel::Warn => "warn",
            ErrorLevel::Error | ErrorLevel::Fatal => "error",
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            file_enabled: false,
            file_path: None,
            level: "info".to_string(),
            encoding: LogEncoding::Json,
            exit_on_fatal: false,
        }
    }
}
