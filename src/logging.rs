//! Stderr tracing setup for the maintenance binaries.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "MAINT_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install a stderr `fmt` subscriber filtered by `MAINT_LOG` (default `warn`).
///
/// Stdout stays reserved for the single result line. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
