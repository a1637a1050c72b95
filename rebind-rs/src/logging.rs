//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so they never interleave with `output(x)` lines on
//! stdout.  `RUST_LOG` overrides the default filter.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.  `debug` turns on statement tracing
/// for this crate.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "warn,rebind=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber.  Call once, from `main`.
pub fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
