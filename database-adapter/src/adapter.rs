use std::error::Error as StdError;

use error_common::{AppError, BoxError, Details, ErrorCode, ErrorLevel};
use serde_json::Value;
use sqlx::postgres::PgDatabaseError;

use crate::vendor::{VendorClass, VendorError};

pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const DUPLICATE_KEY_MESSAGE: &str = "Resource already exists";
pub const FOREIGN_KEY_MESSAGE: &str = "Invalid reference";
pub const CONNECTION_MESSAGE: &str = "Database connection error";
pub const DATABASE_ERROR_MESSAGE: &str = "Database error";

/// Metadata pulled off a vendor error before it is boxed as the cause.
#[derive(Debug, Default)]
struct VendorFacts {
    code: Option<String>,
    constraint: Option<String>,
    table: Option<String>,
}

impl VendorFacts {
    fn of<E: VendorError + ?Sized>(err: &E) -> Self {
        Self {
            code: err.code().map(str::to_owned),
            constraint: err.constraint().map(str::to_owned),
            table: err.table().map(str::to_owned),
        }
    }
}

/// What a driver error turned out to be.
#[derive(Debug)]
enum Finding {
    NotFound,
    Vendor(VendorFacts),
}

/// Classifies database errors into records.
///
/// Constraint and table names are copied into the record details when the
/// matching switch is on and the driver reported a non-empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseAdapter {
    include_constraint: bool,
    include_table: bool,
}

impl Default for DatabaseAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseAdapter {
    pub fn new() -> Self {
        Self {
            include_constraint: true,
            include_table: true,
        }
    }

    #[must_use]
    pub fn with_constraint_details(mut self, enabled: bool) -> Self {
        self.include_constraint = enabled;
        self
    }

    #[must_use]
    pub fn with_table_details(mut self, enabled: bool) -> Self {
        self.include_table = enabled;
        self
    }

    pub fn from_sqlx(&self, err: sqlx::Error) -> AppError {
        let finding = inspect_sqlx(&err);
        self.conclude(finding, err.into())
    }

    pub fn from_vendor<E: VendorError>(&self, err: E) -> AppError {
        let facts = VendorFacts::of(&err);
        self.classify(facts, Box::new(err))
    }

    /// Classifies a type-erased error, e.g. one returned by a repository
    /// layer as `anyhow::Error` or a wrapped record.
    ///
    /// The first `sqlx::Error` or PostgreSQL error in the source chain
    /// decides the branch; without one the generic database record is
    /// produced. The whole of `err` becomes the cause either way.
    pub fn from_error(&self, err: impl Into<BoxError>) -> AppError {
        let err = err.into();
        let finding = inspect(err.as_ref());
        self.conclude(finding, err)
    }

    fn conclude(&self, finding: Option<Finding>, cause: BoxError) -> AppError {
        match finding {
            Some(Finding::NotFound) => not_found(cause),
            Some(Finding::Vendor(facts)) => self.classify(facts, cause),
            None => generic(cause),
        }
    }

    fn classify(&self, facts: VendorFacts, cause: BoxError) -> AppError {
        let class = VendorClass::of(facts.code.as_deref());
        tracing::debug!(code = ?facts.code, ?class, "classifying database error");

        let builder = match class {
            VendorClass::DuplicateKey => AppError::builder()
                .with_message(DUPLICATE_KEY_MESSAGE)
                .with_code(ErrorCode::DbDuplicateKey)
                .with_status(409)
                .with_level(ErrorLevel::Warn)
                .with_sensitive(false)
                .with_details(self.details(&facts)),
            VendorClass::ForeignKey => AppError::builder()
                .with_message(FOREIGN_KEY_MESSAGE)
                .with_code(ErrorCode::DbForeignKey)
                .with_status(400)
                .with_level(ErrorLevel::Warn)
                .with_sensitive(false)
                .with_details(self.details(&facts)),
            VendorClass::Connection => AppError::builder()
                .with_message(CONNECTION_MESSAGE)
                .with_code(ErrorCode::DbConnectionError)
                .with_status(500)
                .with_level(ErrorLevel::Error)
                .with_sensitive(true),
            VendorClass::Other => AppError::builder()
                .with_message(DATABASE_ERROR_MESSAGE)
                .with_code(ErrorCode::DbError)
                .with_status(500)
                .with_level(ErrorLevel::Error)
                .with_sensitive(true)
                .with_details(self.details(&facts)),
        };

        builder.with_internal(cause).build()
    }

    fn details(&self, facts: &VendorFacts) -> Details {
        let mut details = Details::new();
        if self.include_constraint {
            if let Some(constraint) = facts.constraint.as_deref().filter(|c| !c.is_empty()) {
                details.insert("constraint".to_string(), Value::from(constraint));
            }
        }
        if self.include_table {
            if let Some(table) = facts.table.as_deref().filter(|t| !t.is_empty()) {
                details.insert("table".to_string(), Value::from(table));
            }
        }
        details
    }
}

fn inspect_sqlx(err: &sqlx::Error) -> Option<Finding> {
    match err {
        sqlx::Error::RowNotFound => Some(Finding::NotFound),
        sqlx::Error::Database(db) => {
            let table = db
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(PgDatabaseError::table)
                .map(str::to_owned);
            Some(Finding::Vendor(VendorFacts {
                code: db.code().map(|code| code.into_owned()),
                constraint: db.constraint().map(str::to_owned),
                table,
            }))
        }
        _ => None,
    }
}

fn inspect(err: &(dyn StdError + 'static)) -> Option<Finding> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(sqlx_err) = e.downcast_ref::<sqlx::Error>() {
            return inspect_sqlx(sqlx_err);
        }
        if let Some(pg) = e.downcast_ref::<PgDatabaseError>() {
            return Some(Finding::Vendor(VendorFacts::of(pg)));
        }
        current = e.source();
    }
    None
}

fn not_found(cause: BoxError) -> AppError {
    AppError::builder()
        .with_message(NOT_FOUND_MESSAGE)
        .with_code(ErrorCode::NotFound)
        .with_status(404)
        .with_level(ErrorLevel::Info)
        .with_sensitive(false)
        .with_internal(cause)
        .build()
}

fn generic(cause: BoxError) -> AppError {
    AppError::builder()
        .with_message(DATABASE_ERROR_MESSAGE)
        .with_code(ErrorCode::DbError)
        .with_status(500)
        .with_level(ErrorLevel::Error)
        .with_sensitive(true)
        .with_internal(cause)
        .build()
}
