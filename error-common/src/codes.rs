// Error codes
// The closed catalogue of machine-readable categories carried by every record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Machine-readable error category.
///
/// Adding a variant is non-breaking; renaming or removing one breaks every
/// client that matches on the serialized code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Generic
    InternalError,
    UnknownError,

    // Validation
    ValidationError,
    InvalidInput,

    // Authentication
    Unauthorized,
    Forbidden,

    // Resources
    NotFound,
    AlreadyExists,

    // Database
    DbError,
    DbDuplicateKey,
    DbForeignKey,
    DbNoRows,
    DbConnectionError,

    // Network
    Timeout,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 14] = [
        ErrorCode::InternalError,
        ErrorCode::UnknownError,
        ErrorCode::ValidationError,
        ErrorCode::InvalidInput,
        ErrorCode::Unauthorized,
        ErrorCode::Forbidden,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::DbError,
        ErrorCode::DbDuplicateKey,
        ErrorCode::DbForeignKey,
        ErrorCode::DbNoRows,
        ErrorCode::DbConnectionError,
        ErrorCode::Timeout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::DbError => "DB_ERROR",
            ErrorCode::DbDuplicateKey => "DB_DUPLICATE_KEY",
            ErrorCode::DbForeignKey => "DB_FOREIGN_KEY",
            ErrorCode::DbNoRows => "DB_NO_ROWS",
            ErrorCode::DbConnectionError => "DB_CONNECTION_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a string that is not part of the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code: {0}")]
pub struct UnknownCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_string()))
    }
}
