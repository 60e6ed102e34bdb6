//! Tracing initialization for test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceCell<()> = OnceCell::new();

/// Install the tracing subscriber for a test binary, once per process.
///
/// Level precedence is `TEST_LOG`, then `RUST_LOG`, then `"warn"`. Output is
/// routed through the test writer so the harness captures it per test, and
/// timestamps are suppressed to keep the lines stable across runs. Safe to
/// call from every suite; repeat calls are no-ops.
pub fn init() {
    INIT.get_or_init(|| {
        fmt()
            .with_env_filter(level_filter())
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

fn level_filter() -> EnvFilter {
    std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}
