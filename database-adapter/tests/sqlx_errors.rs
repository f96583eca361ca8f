use std::borrow::Cow;
use std::error::Error as StdError;

use database_adapter::DatabaseAdapter;
use error_common::{BoxError, ErrorCode, ErrorLevel};
use serde_json::json;
use sqlx::error::{DatabaseError, ErrorKind};

/// Stand-in for a driver error surfaced through `sqlx::Error::Database`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct DriverError {
    message: String,
    code: &'static str,
    constraint: Option<&'static str>,
}

impl DatabaseError for DriverError {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.code))
    }

    fn constraint(&self) -> Option<&str> {
        self.constraint
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

fn database_error(code: &'static str, constraint: Option<&'static str>) -> sqlx::Error {
    sqlx::Error::Database(Box::new(DriverError {
        message: format!("driver failure {code}"),
        code,
        constraint,
    }))
}

#[test]
fn test_unique_violation_from_sqlx() {
    let err = DatabaseAdapter::new().from_sqlx(database_error("23505", Some("patients_mrn_key")));

    assert_eq!(err.code, ErrorCode::DbDuplicateKey);
    assert_eq!(err.status, 409);
    assert_eq!(err.level, ErrorLevel::Warn);
    assert!(!err.is_sensitive);
    assert_eq!(err.details.get("constraint"), Some(&json!("patients_mrn_key")));
    // table names are only read from PostgreSQL errors
    assert!(err.details.get("table").is_none());

    let cause = err.internal().unwrap();
    assert!(cause.downcast_ref::<sqlx::Error>().is_some());
}

#[test]
fn test_connection_exception_from_sqlx() {
    let err = DatabaseAdapter::new().from_sqlx(database_error("08006", Some("ignored")));

    assert_eq!(err.code, ErrorCode::DbConnectionError);
    assert_eq!(err.safe_code(), ErrorCode::InternalError);
    assert!(err.details.is_empty());
}

#[test]
fn test_unknown_code_from_sqlx_is_sensitive() {
    let err = DatabaseAdapter::new()
        .with_constraint_details(false)
        .from_sqlx(database_error("22001", Some("patients_name_check")));

    assert_eq!(err.code, ErrorCode::DbError);
    assert!(err.is_sensitive);
    assert!(err.details.is_empty());
    assert_eq!(err.safe_message(), "Internal server error");
}

#[test]
fn test_non_database_errors_are_generic() {
    let adapter = DatabaseAdapter::new();
    for err in [sqlx::Error::PoolClosed, sqlx::Error::WorkerCrashed] {
        let record = adapter.from_sqlx(err);
        assert_eq!(record.code, ErrorCode::DbError);
        assert_eq!(record.status, 500);
        assert!(record.is_sensitive);
    }
}

#[test]
fn test_boxed_unique_violation_is_classified() {
    let boxed: BoxError = Box::new(database_error("23505", Some("patients_mrn_key")));
    let err = DatabaseAdapter::new().from_error(boxed);

    assert_eq!(err.code, ErrorCode::DbDuplicateKey);
    assert_eq!(err.status, 409);
    assert_eq!(err.details.get("constraint"), Some(&json!("patients_mrn_key")));
    assert!(err.internal().unwrap().downcast_ref::<sqlx::Error>().is_some());
}

#[derive(Debug, thiserror::Error)]
#[error("saving patient")]
struct RepositoryError(#[source] sqlx::Error);

#[test]
fn test_foreign_key_behind_repository_error_is_classified() {
    let err = DatabaseAdapter::new()
        .from_error(RepositoryError(database_error("23503", Some("visits_patient_id_fkey"))));

    assert_eq!(err.code, ErrorCode::DbForeignKey);
    assert_eq!(err.status, 400);
    assert!(!err.is_sensitive);
    assert_eq!(err.internal().unwrap().to_string(), "saving patient");
}

#[test]
fn test_io_error_is_generic_database_error() {
    let err = DatabaseAdapter::new().from_error(std::io::Error::new(std::io::ErrorKind::Other, "broken pipe"));

    assert_eq!(err.code, ErrorCode::DbError);
    assert_eq!(err.status, 500);
    assert!(err.is_sensitive);
    assert_eq!(err.safe_message(), "Internal server error");
}
