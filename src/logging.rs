//! Tracing subscriber setup for binaries and tools embedding the link

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Install a formatted subscriber filtered by `RUST_LOG`.
///
/// Fails if a global subscriber is already installed.
///
/// ```
/// datalink::logging::init()?;
/// tracing::info!("link starting");
/// assert!(datalink::logging::init().is_err());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_rejected() {
        let _ = init();
        let err = init().unwrap_err();
        assert!(err.to_string().contains("tracing subscriber"));
    }
}
