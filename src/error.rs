//! Error types for the stack assembly layer.

use crate::validate::ValidationReport;
use std::path::PathBuf;

/// Result type alias for stack assembly operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling a stack.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Catalog / Registry Errors
    // =========================================================================
    /// A bundled catalog document could not be parsed.
    #[error("failed to load catalog entry '{file}': {reason}")]
    CatalogLoad { file: String, reason: String },

    /// Two catalog entries share the same service id.
    #[error("duplicate service id in catalog: {0}")]
    DuplicateServiceId(String),

    /// A catalog entry carries an id that fails the naming rules.
    #[error("invalid service id '{id}': {reason}")]
    InvalidServiceId { id: String, reason: &'static str },

    /// Service not found in the registry.
    #[error("service not found: {0}")]
    ServiceNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// The selection failed validation; the report lists every finding.
    #[error("configuration validation failed\n{0}")]
    ValidationFailed(ValidationReport),

    // =========================================================================
    // Render Errors
    // =========================================================================
    /// VPN-mode rendering was invoked without a gateway service in the set.
    ///
    /// The orchestrator injects the gateway before validation runs, so
    /// reaching this is a sequencing bug, not a user-facing condition.
    #[error("no VPN gateway service present while rendering VPN mode")]
    GatewayMissing,

    /// The manifest document could not be serialized.
    #[error("failed to render manifest: {0}")]
    Render(String),

    // =========================================================================
    // Profile Errors
    // =========================================================================
    /// Named profile does not exist on disk.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    /// A profile file exists but could not be parsed.
    #[error("invalid profile at {path}: {reason}")]
    InvalidProfile { path: PathBuf, reason: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
