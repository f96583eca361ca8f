use error_common::{ErrorCode, ErrorContext};
use error_framework::{init_from_config, FrameworkConfig};

#[test]
fn test_init_from_config_reuses_host_subscriber() {
    // the host application owns logging
    tracing_subscriber::fmt().with_test_writer().init();

    let manager = init_from_config(&FrameworkConfig::default()).unwrap();

    let installed = error_framework::global().unwrap();
    assert!(std::ptr::eq(installed.manager().as_ref(), manager.as_ref()));

    let handled = manager.handle(&ErrorContext::new(), "queue full");
    assert_eq!(handled.code, ErrorCode::InternalError);
    assert!(handled.trace_id.is_some());
}
