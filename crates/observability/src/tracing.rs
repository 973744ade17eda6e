//! Subscriber setup for lookup sessions.
//!
//! The catalog and scanner crates emit structured events (`catalog loaded`,
//! `save rejected`, `barcode detected`, ...) with fields such as `products`,
//! `barcode` and `activation`. Hosts ship them as JSON lines; tests get plain
//! text through the harness writer.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Filter used by [`init_for_tests`] when `RUST_LOG` is unset.
pub const TEST_FILTER: &str = "barlo_catalog=debug,barlo_scanner=debug";

fn env_filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// JSON lines with timestamps and span context; repeated calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter_or(DEFAULT_FILTER))
        .with_current_span(true)
        .with_target(false)
        .try_init();
}

/// Plain-text logs captured per test by the harness.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter_or(TEST_FILTER))
        .with_test_writer()
        .try_init();
}
