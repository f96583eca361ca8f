use error_framework::{DatabaseKind, FrameworkConfig};

// Environment variables are process-wide; this file holds a single test.
#[test]
fn test_environment_overrides() {
    std::env::set_var("ERRFW__LOGGER__LEVEL", "debug");
    std::env::set_var("ERRFW__DATABASE__KIND", "postgres");
    std::env::set_var("ERRFW__VALIDATOR__ENABLED", "false");

    let config = FrameworkConfig::load(None).unwrap();

    assert_eq!(config.logger.level, "debug");
    assert_eq!(config.database.kind, DatabaseKind::Postgres);
    assert!(!config.validator.enabled);
    assert!(config.trace.enabled);
}
