//! Tracing subscriber bootstrap for the accounts binary.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global JSON tracing subscriber.
///
/// The filter is read from `RUST_LOG`, falling back to `info`. Installing
/// twice (for example from tests) only emits a warning.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}
