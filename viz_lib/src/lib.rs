pub mod app;
pub use app::App;
pub mod config;
pub mod control;
pub mod error;
pub mod export;
pub mod input;
pub mod panel;
pub mod poller;
pub mod preferences;
pub mod render;
pub mod selection;
pub mod topology;
pub mod viewport;

// Exported unconditionally so integration tests can import
// `viz_lib::test_helpers` without a feature flag.
pub mod test_helpers;

/// Initialize a tracing subscriber for tests. Safe to call multiple times.
pub fn init_test_tracing() {
    use std::sync::Once;
    static START: Once = Once::new();
    START.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
