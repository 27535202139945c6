//! Tracing bootstrap.
//!
//! Embedding applications that already install a `tracing` subscriber can
//! skip this entirely; it exists so examples and tests get sane output with
//! one call.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "livetrack=info";

/// Installs a formatting subscriber honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops if a global
/// subscriber is already installed.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
