//! # Stack Assembly Constants
//!
//! Defines the well-known identifiers, file names, and defaults used
//! throughout the stack assembly layer. These constants are the single
//! source of truth for values that the catalog, validators, renderers,
//! and CLI must agree on.
//!
//! ## Cross-References
//!
//! - [`crate::registry`]: uses the gateway id and id validation rules
//! - [`crate::compose`]: uses the bridge network name and driver
//! - [`crate::orchestrator`]: uses the output file names
//! - [`crate::env`]: uses the environment defaults

// =============================================================================
// Well-Known Service Identifiers
// =============================================================================

/// Id of the VPN gateway service in the catalog.
///
/// The orchestrator prepends this service to a selection when VPN mode is
/// enabled, and the VPN-mode renderer partitions the set around it.
pub const GATEWAY_SERVICE_ID: &str = "gluetun";

// =============================================================================
// Compose Document
// =============================================================================

/// Name of the shared user-defined network in bridge mode.
pub const BRIDGE_NETWORK_NAME: &str = "media";

/// Driver of the shared network in bridge mode.
pub const BRIDGE_NETWORK_DRIVER: &str = "bridge";

/// File name of the rendered manifest.
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// File name of the rendered environment file.
pub const ENV_FILE_NAME: &str = ".env";

/// Placeholder in catalog volume templates resolved by the env file.
///
/// Host paths in the catalog are written as `${BASE_PATH}/...` and left
/// untouched in the manifest; docker compose substitutes them from the
/// `BASE_PATH` entry of the generated `.env`.
pub const BASE_PATH_PLACEHOLDER: &str = "${BASE_PATH}";

/// Timestamp suffix format for `*.backup.<stamp>` files.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// =============================================================================
// Environment Defaults
// =============================================================================

/// Default compose project name.
pub const DEFAULT_PROJECT_NAME: &str = "mediarig";

/// Default base path for service configuration and media volumes.
pub const DEFAULT_BASE_PATH: &str = "/opt/mediarig";

/// Default timezone passed to every container.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Default numeric user id for file ownership inside containers.
pub const DEFAULT_PUID: &str = "1000";

/// Default numeric group id for file ownership inside containers.
pub const DEFAULT_PGID: &str = "1000";

/// Default file-creation mask.
pub const DEFAULT_UMASK: &str = "002";

/// Default DNS address for the VPN tunnel.
pub const DEFAULT_DNS_ADDRESS: &str = "1.1.1.1";

/// Default VPN tunnel type.
pub const DEFAULT_VPN_TYPE: &str = "wireguard";

// =============================================================================
// Profiles
// =============================================================================

/// Directory for saved profiles, relative to the user's home directory.
pub const PROFILE_DIR: &str = ".mediarig/profiles";

/// Current profile format version.
pub const PROFILE_VERSION: &str = "1.0.0";

// =============================================================================
// Validation Patterns
// =============================================================================

/// Valid characters for service and profile identifiers.
///
/// Lowercase alphanumerics plus `-` and `_`. Excludes `/`, `.`, and other
/// characters that would be unsafe when ids end up in filesystem paths or
/// container names.
pub const SERVICE_ID_VALID_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789-_";

/// Maximum service id length.
pub const MAX_SERVICE_ID_LEN: usize = 64;

// =============================================================================
// Service Id Validation Helper
// =============================================================================

/// Validates a service (or profile) identifier for safety.
///
/// # Returns
///
/// `Ok(())` if valid, `Err(reason)` with a description of the failure.
#[inline]
#[must_use = "validation result must be checked before the id is used in a path"]
pub fn validate_service_id(id: &str) -> std::result::Result<(), &'static str> {
    if id.is_empty() {
        return Err("id cannot be empty");
    }
    if id.len() > MAX_SERVICE_ID_LEN {
        return Err("id exceeds maximum length");
    }
    if !id.chars().all(|c| SERVICE_ID_VALID_CHARS.contains(c)) {
        return Err("id contains invalid characters");
    }
    Ok(())
}
