use squarefund::setup_logging;

#[test]
fn test_logging_setup() {
    // Verifies that the logging setup function doesn't panic
    let result = std::panic::catch_unwind(|| {
        setup_logging();
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}

#[test]
fn test_logging_setup_is_idempotent() {
    // Every Lambda binary calls this once, but tests may call it many times
    setup_logging();
    setup_logging();
}
