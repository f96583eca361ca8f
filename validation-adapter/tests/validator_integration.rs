use error_common::{ErrorCode, ErrorLevel};
use serde_json::json;
use validation_adapter::{ValidationAdapter, ValidationFailure};
use validator::Validate;

#[derive(Debug, Validate)]
#[allow(non_snake_case)]
struct RegisterPatient {
    #[validate(email)]
    Email: String,
    #[validate(length(min = 2, max = 50))]
    FirstName: String,
    #[validate(range(min = 0, max = 130))]
    Age: i32,
    #[validate(length(equal = 6))]
    PostalCode: String,
}

fn valid() -> RegisterPatient {
    RegisterPatient {
        Email: "jane@example.com".to_string(),
        FirstName: "Jane".to_string(),
        Age: 42,
        PostalCode: "560001".to_string(),
    }
}

#[test]
fn test_derived_validation_maps_to_details() {
    let input = RegisterPatient {
        Email: "not-an-email".to_string(),
        FirstName: "J".to_string(),
        Age: 200,
        PostalCode: "12".to_string(),
    };
    let errors = input.validate().unwrap_err();

    let err = ValidationAdapter::new().from_validation_errors(&errors);

    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(err.status, 400);
    assert_eq!(err.level, ErrorLevel::Warn);
    assert!(!err.is_sensitive);
    assert_eq!(err.details.len(), 4);
    assert_eq!(err.details.get("email"), Some(&json!("must be a valid email")));
    assert_eq!(err.details.get("first_name"), Some(&json!("must be at least 2 characters")));
    assert_eq!(err.details.get("age"), Some(&json!("must be <= 130")));
    assert_eq!(err.details.get("postal_code"), Some(&json!("must be exactly 6 characters")));
}

#[test]
fn test_overrides_apply_to_derived_errors() {
    let input = RegisterPatient {
        Email: "nope".to_string(),
        ..valid()
    };
    let errors = input.validate().unwrap_err();

    let adapter = ValidationAdapter::new().with_field_message("Email", "email", "please check the address");
    let err = adapter.from_error(&errors);

    assert_eq!(err.details.len(), 1);
    assert_eq!(err.details.get("email"), Some(&json!("please check the address")));
}

#[test]
fn test_failure_keeps_original_field_names() {
    let input = RegisterPatient {
        FirstName: "x".repeat(60),
        ..valid()
    };
    let failure = ValidationFailure::from(&input.validate().unwrap_err());

    assert_eq!(failure.violations().len(), 1);
    let violation = &failure.violations()[0];
    assert_eq!(violation.field, "FirstName");
    assert_eq!(violation.tag, "max");
    assert_eq!(violation.param.as_deref(), Some("50"));
}

#[test]
fn test_valid_input_has_no_errors() {
    assert!(valid().validate().is_ok());
}
