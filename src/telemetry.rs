//! Tracing subscriber installation.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Failure to install the global subscriber.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(String);

/// Installs a formatted subscriber filtered by `RUST_LOG`, defaulting to
/// `info`, or `debug` when `debug` is set.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a global subscriber is already set.
pub fn init_tracing(debug: bool) -> Result<(), TelemetryError> {
    let fallback = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| TelemetryError(err.to_string()))
}
