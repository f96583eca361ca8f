use std::error::Error as StdError;

use sqlx::postgres::PgDatabaseError;

/// SQLSTATE `unique_violation`
pub const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE `foreign_key_violation`
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE class 08 codes treated as connection failures.
pub const CONNECTION_EXCEPTIONS: [&str; 3] = ["08000", "08003", "08006"];

/// A driver error that carries a vendor code and constraint metadata.
///
/// Implemented for PostgreSQL errors out of the box. Other drivers can
/// implement it and go through `DatabaseAdapter::from_vendor`.
pub trait VendorError: StdError + Send + Sync + 'static {
    fn code(&self) -> Option<&str>;

    fn constraint(&self) -> Option<&str> {
        None
    }

    fn table(&self) -> Option<&str> {
        None
    }
}

impl VendorError for PgDatabaseError {
    fn code(&self) -> Option<&str> {
        Some(PgDatabaseError::code(self))
    }

    fn constraint(&self) -> Option<&str> {
        PgDatabaseError::constraint(self)
    }

    fn table(&self) -> Option<&str> {
        PgDatabaseError::table(self)
    }
}

/// What a vendor code means for the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorClass {
    DuplicateKey,
    ForeignKey,
    Connection,
    Other,
}

impl VendorClass {
    pub fn of(code: Option<&str>) -> Self {
        match code {
            Some(UNIQUE_VIOLATION) => Self::DuplicateKey,
            Some(FOREIGN_KEY_VIOLATION) => Self::ForeignKey,
            Some(code) if CONNECTION_EXCEPTIONS.contains(&code) => Self::Connection,
            _ => Self::Other,
        }
    }
}
