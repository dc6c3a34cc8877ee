//! Logging initialization for embedding frontends.
//!
//! The client itself only emits `tracing` events; the frontend decides
//! where they go. This helper installs the standard fmt subscriber with
//! an env-filter (`RUST_LOG`), defaulting to `info`.

use tracing_subscriber::EnvFilter;

/// Install the default subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .try_init();
}
