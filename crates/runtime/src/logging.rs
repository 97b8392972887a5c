//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::api::{Result, RuntimeError};

/// Installs a stderr `fmt` subscriber filtered by `directive`, or by `RUST_LOG`
/// when no directive is given (falling back to `info`).
///
/// Returns `Ok(false)` if a global subscriber was already installed; calling it
/// again is harmless.
pub fn init_logging(directive: Option<&str>) -> Result<bool> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive).map_err(|e| {
            RuntimeError::InvalidConfig(format!("Invalid log filter `{}`: {}", directive, e))
        })?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Logging initialized");
    }
    Ok(installed)
}
