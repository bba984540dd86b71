//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. Later calls are no-ops, so tests and
/// embedders may call this freely.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
