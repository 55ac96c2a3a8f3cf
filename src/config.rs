//! Link configuration loaded from YAML

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{LinkError, Result};

/// Default UDP port panels poll.
pub const DEFAULT_PORT: u16 = 52020;

/// Runtime settings for a link. Every field has a default, so an empty
/// document is a valid configuration.
///
/// ```rust
/// use datalink::LinkConfig;
///
/// let config = LinkConfig::from_yaml_str("port: 6000\ndifferencing: false\n")?;
/// assert_eq!(config.port, 6000);
/// assert!(!config.differencing);
/// assert_eq!(config.poll_timeout_ms, 500);
/// # Ok::<(), datalink::LinkError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    /// Socket wait before falling through to controller polling
    pub poll_timeout_ms: u64,
    /// Poll silence after which a channel counts as detached
    pub inactivity_ms: u64,
    /// Send deltas after the first full response; off sends full responses only
    pub differencing: bool,
    /// Indicated-heading jump (degrees) that triggers a gyro reset
    pub heading_drift_threshold: f64,
    pub receive_buffer: usize,
    /// Pending control requests the engine task will queue
    pub control_queue_depth: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            poll_timeout_ms: 500,
            inactivity_ms: 1000,
            differencing: true,
            heading_drift_threshold: 5.0,
            receive_buffer: 1024,
            control_queue_depth: 64,
        }
    }
}

impl LinkConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: LinkConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| LinkError::config("<inline>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LinkError::config(path, format!("cannot read file: {}", e)))?;
        let config: LinkConfig =
            serde_yaml_ng::from_str(&text).map_err(|e| LinkError::config(path, e.to_string()))?;
        config.validate().map_err(|e| match e {
            LinkError::Config { details, .. } => LinkError::config(path, details),
            other => other,
        })?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).map_err(|e| LinkError::config("<inline>", e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |details: &str| Err(LinkError::config("<inline>", details));
        if self.poll_timeout_ms == 0 {
            return invalid("poll_timeout_ms must be greater than zero");
        }
        if self.inactivity_ms == 0 {
            return invalid("inactivity_ms must be greater than zero");
        }
        if self.receive_buffer == 0 {
            return invalid("receive_buffer must be greater than zero");
        }
        if self.control_queue_depth == 0 {
            return invalid("control_queue_depth must be greater than zero");
        }
        if !(self.heading_drift_threshold.is_finite() && self.heading_drift_threshold > 0.0) {
            return invalid("heading_drift_threshold must be a positive number of degrees");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn inactivity(&self) -> Duration {
        Duration::from_millis(self.inactivity_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = LinkConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, LinkConfig::default());
        assert_eq!(config.socket_addr().port(), 52020);
        assert_eq!(config.poll_timeout(), Duration::from_millis(500));
        assert_eq!(config.inactivity(), Duration::from_secs(1));
    }

    #[test]
    fn zero_timeouts_and_buffers_are_rejected() {
        for yaml in [
            "poll_timeout_ms: 0",
            "inactivity_ms: 0",
            "receive_buffer: 0",
            "control_queue_depth: 0",
            "heading_drift_threshold: -1.0",
        ] {
            assert!(
                matches!(LinkConfig::from_yaml_str(yaml), Err(LinkError::Config { .. })),
                "{yaml} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(LinkConfig::from_yaml_str("prot: 1234").is_err());
    }

    #[test]
    fn yaml_round_trips() {
        let config = LinkConfig { port: 6001, differencing: false, ..LinkConfig::default() };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(LinkConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn missing_file_reports_path() {
        match LinkConfig::from_path("/nonexistent/datalink.yaml") {
            Err(LinkError::Config { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/datalink.yaml"))
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
