//! Common test utilities shared across integration tests.

/// Initialize test tracing (call once at the beginning of tests).
///
/// Sets up tracing with debug output from this crate only, written through
/// the test writer. Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("schnorr_id=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}
