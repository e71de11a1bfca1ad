//! Service model types.
//!
//! A [`Service`] is one deployable application unit in the stack (a
//! download client, an indexer, a media manager, ...). Definitions are
//! parsed from the bundled catalog at registry construction and never
//! mutated afterwards; every validation and render call shares the same
//! read-only values.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Category
// =============================================================================

/// Closed classification tag grouping services.
///
/// The declaration order doubles as the display and sort order: listings
/// and rendered manifests order services by category first, name second.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    /// Download clients (torrent, usenet).
    Download,
    /// Indexer managers and solvers.
    Indexer,
    /// Media library managers.
    Media,
    /// Subtitle fetchers.
    Subtitles,
    /// Streaming servers.
    Streaming,
    /// Request management frontends.
    Request,
    /// Transcoding pipelines.
    Transcode,
    /// VPN gateway.
    Vpn,
}

impl ServiceCategory {
    /// All categories in display order.
    pub const ALL: [ServiceCategory; 8] = [
        ServiceCategory::Download,
        ServiceCategory::Indexer,
        ServiceCategory::Media,
        ServiceCategory::Subtitles,
        ServiceCategory::Streaming,
        ServiceCategory::Request,
        ServiceCategory::Transcode,
        ServiceCategory::Vpn,
    ];

    /// Lowercase tag as it appears in catalog files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Download => "download",
            ServiceCategory::Indexer => "indexer",
            ServiceCategory::Media => "media",
            ServiceCategory::Subtitles => "subtitles",
            ServiceCategory::Streaming => "streaming",
            ServiceCategory::Request => "request",
            ServiceCategory::Transcode => "transcode",
            ServiceCategory::Vpn => "vpn",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Port / Volume Mappings
// =============================================================================

/// Transport protocol of a published port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => f.write_str("tcp"),
            Protocol::Udp => f.write_str("udp"),
        }
    }
}

/// A host-to-container port mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    /// Port published on the host.
    pub host: u16,
    /// Port inside the container.
    pub container: u16,
    /// Transport protocol (defaults to TCP).
    #[serde(default = "default_protocol")]
    pub protocol: Protocol,
}

fn default_protocol() -> Protocol {
    Protocol::Tcp
}

/// A host-to-container volume mapping.
///
/// The host side is a template and may contain the `${BASE_PATH}`
/// placeholder, resolved by docker compose from the generated `.env`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMapping {
    /// Host path template.
    pub host: String,
    /// Mount point inside the container.
    pub container: String,
    /// If true, mount read-only.
    #[serde(default)]
    pub read_only: bool,
}

// =============================================================================
// Network Configuration
// =============================================================================

/// Network configuration for both deployment modes.
///
/// Every service carries both halves; the active deployment mode decides
/// which one the renderer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Settings used when the stack runs in bridge mode.
    #[serde(default)]
    pub bridge_mode: BridgeModeConfig,
    /// Settings used when the stack runs through the VPN gateway.
    #[serde(default)]
    pub vpn_mode: VpnModeConfig,
}

/// Bridge-mode network settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeModeConfig {
    /// Hostname on the shared network.
    #[serde(default)]
    pub hostname: String,
    /// Networks the service joins. Must be non-empty for bridge-mode
    /// deployment; the network validator rejects entries where it is not.
    #[serde(default)]
    pub networks: Vec<String>,
}

/// VPN-mode network settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnModeConfig {
    /// `network_mode` value sharing the gateway's network namespace,
    /// e.g. `service:gluetun`.
    #[serde(default)]
    pub network_mode: String,
}

// =============================================================================
// Service
// =============================================================================

/// One deployable application unit in the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique id, stable across the registry.
    pub id: String,
    /// Human-readable label.
    pub name: String,
    /// Category tag.
    pub category: ServiceCategory,
    /// Short description shown in listings.
    #[serde(default)]
    pub description: String,
    /// Container image reference.
    pub image: String,
    /// Container name in the rendered manifest.
    pub container_name: String,
    /// Published ports.
    #[serde(default)]
    pub ports: Vec<PortMapping>,
    /// Volume mounts.
    #[serde(default)]
    pub volumes: Vec<VolumeMapping>,
    /// Environment entries, `KEY=VALUE` form, rendered verbatim.
    #[serde(default)]
    pub environment: Vec<String>,
    /// Host devices passed through to the container.
    #[serde(default)]
    pub devices: Vec<String>,
    /// Added Linux capabilities.
    #[serde(default)]
    pub cap_add: Vec<String>,
    /// Network configuration for both modes.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Restart policy string.
    #[serde(default = "default_restart")]
    pub restart: String,
    /// Whether the service may optionally run through the tunnel.
    #[serde(default)]
    pub supports_vpn: bool,
    /// Whether the service is unusable without the tunnel.
    #[serde(default)]
    pub requires_vpn: bool,
    /// Ids of services that must also be selected. Missing dependencies
    /// are a hard validation error, never silently added.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Advisory flag; not enforced.
    #[serde(default)]
    pub optional: bool,
}

fn default_restart() -> String {
    "unless-stopped".to_string()
}

impl Service {
    /// Whether the service can run under the given VPN flag.
    ///
    /// A service that does not require the tunnel is compatible with
    /// either mode; one that requires it is compatible only when VPN mode
    /// is active.
    pub fn is_compatible_with_vpn(&self, vpn_enabled: bool) -> bool {
        if self.requires_vpn {
            return vpn_enabled;
        }
        true
    }

    /// Whether the service declares any dependencies.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Whether this is the VPN gateway.
    pub fn is_gateway(&self) -> bool {
        self.category == ServiceCategory::Vpn
    }
}
