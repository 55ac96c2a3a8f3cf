//! Error types for the data link.
//!
//! Every fallible operation in the crate returns [`LinkError`]. Nothing in the
//! link is fatal at runtime: protocol mismatches get a corrective reply, writes
//! before the simulator is connected are dropped, and missing vendor data falls
//! back to the last known value. Errors therefore mostly surface at construction
//! time (schema validation, configuration) or from collaborators.
//!
//! ## Error Categories
//!
//! - **Schema Errors**: Invalid field lists, unknown fields, kind mismatches
//! - **Protocol Errors**: Malformed datagrams or delta records
//! - **Host Errors**: Failures reported by the simulator collaborators
//! - **Network Errors**: Socket bind/send/receive failures
//! - **Configuration Errors**: Unreadable or invalid configuration files
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use datalink::LinkError;
//!
//! let error = LinkError::host_unavailable("simulator not running");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for link operations.
pub type Result<T, E = LinkError> = std::result::Result<T, E>;

/// Main error type for link operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LinkError {
    #[error("Host simulator unavailable: {reason}")]
    HostUnavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Network error during {operation}")]
    Network {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error in {path}: {details}")]
    Config { path: PathBuf, details: String },

    #[error("Schema validation failed: {reason}")]
    SchemaValidation { reason: String },

    #[error("Field '{field}' not found in schema")]
    FieldNotFound { field: String },

    #[error("Field '{field}' holds {actual}, not {expected}")]
    TypeMismatch { field: String, expected: &'static str, actual: &'static str },

    #[error("Offset {offset:#x} is outside a {len} byte buffer")]
    OutOfBounds { offset: usize, len: usize },

    #[error("Protocol error: {details}")]
    Protocol { details: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Engine is no longer running")]
    EngineStopped,
}

impl LinkError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            LinkError::HostUnavailable { .. } => true,
            LinkError::Network { .. } => true,
            LinkError::Timeout { .. } => true,
            LinkError::Protocol { .. } => true,
            LinkError::Config { .. } => false,
            LinkError::SchemaValidation { .. } => false,
            LinkError::FieldNotFound { .. } => false,
            LinkError::TypeMismatch { .. } => false,
            LinkError::OutOfBounds { .. } => false,
            LinkError::EngineStopped => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            LinkError::HostUnavailable { .. } => vec![
                "Ensure the flight simulator is running",
                "Load an aircraft so telemetry starts flowing",
                "Restart the data link once the simulator is ready",
            ],
            LinkError::Network { .. } => vec![
                "Check that no other process is bound to the link port",
                "Verify firewall rules allow UDP traffic on the link port",
                "Confirm the configured bind address exists on this machine",
            ],
            LinkError::Config { .. } => vec![
                "Check the configuration file exists and is readable",
                "Validate the YAML syntax",
                "Remove unknown keys and rely on defaults",
            ],
            LinkError::SchemaValidation { .. } => vec![
                "Check field names are unique",
                "Declare derived fields after all host fields",
                "Keep channel sizes distinct from each other and from the write record",
            ],
            LinkError::FieldNotFound { .. } => vec![
                "Check field name spelling",
                "List available fields with Schema::fields()",
            ],
            LinkError::TypeMismatch { .. } => vec![
                "Use the string accessors for fixed-string fields",
                "Use the numeric accessors for float fields",
            ],
            LinkError::OutOfBounds { .. } => vec![
                "Check the panel and link agree on the schema layout",
                "Request a full resync from the panel",
            ],
            LinkError::Protocol { .. } => vec![
                "Check the panel firmware matches the link schema",
                "Request a full resync from the panel",
            ],
            LinkError::Timeout { .. } => vec![
                "Increase the configured timeout",
                "Check the simulator is responding",
            ],
            LinkError::EngineStopped => vec![
                "Restart the data link",
                "Check the logs for the reason the engine stopped",
            ],
        }
    }

    /// Helper constructor for host availability errors.
    pub fn host_unavailable(reason: impl Into<String>) -> Self {
        LinkError::HostUnavailable { reason: reason.into(), source: None }
    }

    /// Helper constructor for host availability errors with source.
    pub fn host_unavailable_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        LinkError::HostUnavailable { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for socket errors with operation context.
    pub fn network(operation: impl Into<String>, source: std::io::Error) -> Self {
        LinkError::Network { operation: operation.into(), source }
    }

    /// Helper constructor for schema validation errors.
    pub fn schema_validation(reason: impl Into<String>) -> Self {
        LinkError::SchemaValidation { reason: reason.into() }
    }

    /// Helper constructor for protocol errors.
    pub fn protocol(details: impl Into<String>) -> Self {
        LinkError::Protocol { details: details.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        LinkError::Config { path: path.into(), details: details.into() }
    }
}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        LinkError::Network { operation: "<unknown>".to_string(), source: err }
    }
}
