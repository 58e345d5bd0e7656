//! Tracing initialization helpers.
//!
//! Binaries call [`init_tracing`] once at startup; tests call
//! [`init_test_tracing`], which is safe to invoke from every test because
//! initialization happens at most once per process.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Default filter applied when `RUST_LOG` is not set.
const DEFAULT_DIRECTIVE: &str = "info";

/// Initializes the global tracing subscriber for a binary.
///
/// The filter is taken from `RUST_LOG` when present, otherwise `info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    });
}

/// Initializes tracing for tests.
///
/// Uses a writer that cooperates with the test harness's output capturing,
/// so log lines only show up for failing tests.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}
