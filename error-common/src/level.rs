use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity used to route a record to the logger.
///
/// Variants are declared in increasing order of severity so the derived
/// `Ord` can be used for threshold checks. Sanitization never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Debug,
    Info,
    Warn,
    #[default]
    Error,
    Fatal,
}

impl ErrorLevel {
    /// Parses a configuration level name. Unknown names map to `Error`.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => ErrorLevel::Debug,
            "info" => ErrorLevel::Info,
            "warn" | "warning" => ErrorLevel::Warn,
            "fatal" => ErrorLevel::Fatal,
            _ => ErrorLevel::Error,
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorLevel::Debug => "DEBUG",
            ErrorLevel::Info => "INFO",
            ErrorLevel::Warn => "WARN",
            ErrorLevel::Error => "ERROR",
            ErrorLevel::Fatal => "FATAL",
        };
        f.write_str(name)
    }
}
