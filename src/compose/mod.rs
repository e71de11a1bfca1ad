//! # Compose Manifest Rendering
//!
//! Turns a validated, sorted service set into a docker-compose document.
//! Two mutually exclusive strategies exist, chosen solely by the VPN
//! flag:
//!
//! - [`BridgeModeStrategy`]: every service joins one shared bridge
//!   network under its own hostname and publishes its own ports.
//! - [`VpnModeStrategy`]: every service shares the gateway's network
//!   namespace; the gateway alone publishes the aggregated port list.
//!
//! Rendering performs no validation. By contract a strategy is only
//! invoked after all validators reported zero blocking findings, and the
//! document is built as a `serde_yaml` value tree whose mappings preserve
//! insertion order, so a given (sorted) selection always renders to the
//! same bytes.

pub mod bridge;
pub mod vpn;

pub use self::bridge::BridgeModeStrategy;
pub use self::vpn::VpnModeStrategy;

use crate::error::{Error, Result};
use crate::service::{PortMapping, Protocol, Service, VolumeMapping};
use serde_yaml::{Mapping, Value};

/// A renderer for one deployment topology.
pub trait ComposeStrategy {
    /// Topology name used in logs.
    fn mode(&self) -> &'static str;

    /// Renders the manifest for the resolved, sorted selection.
    fn render(&self, services: &[Service]) -> Result<String>;
}

/// Selects the strategy for the given VPN flag.
///
/// A pure function of the flag; nothing else influences the choice.
pub fn strategy_for(vpn_enabled: bool) -> Box<dyn ComposeStrategy> {
    if vpn_enabled {
        Box::new(VpnModeStrategy)
    } else {
        Box::new(BridgeModeStrategy)
    }
}

// =============================================================================
// Shared Rendering Helpers
// =============================================================================

/// Compose short syntax for a port mapping. TCP is the compose default
/// and stays implicit; UDP carries an explicit suffix.
pub(crate) fn port_entry(port: &PortMapping) -> String {
    match port.protocol {
        Protocol::Tcp => format!("{}:{}", port.host, port.container),
        Protocol::Udp => format!("{}:{}/udp", port.host, port.container),
    }
}

/// Compose short syntax for a volume mapping.
pub(crate) fn volume_entry(volume: &VolumeMapping) -> String {
    if volume.read_only {
        format!("{}:{}:ro", volume.host, volume.container)
    } else {
        format!("{}:{}", volume.host, volume.container)
    }
}

/// A YAML sequence of strings.
pub(crate) fn string_seq<I, S>(items: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Sequence(items.into_iter().map(|s| Value::String(s.into())).collect())
}

/// Inserts a string entry into a service body.
pub(crate) fn insert_str(body: &mut Mapping, key: &str, value: &str) {
    body.insert(
        Value::String(key.to_string()),
        Value::String(value.to_string()),
    );
}

/// The deployment identity every rendered service starts with.
pub(crate) fn base_body(service: &Service) -> Mapping {
    let mut body = Mapping::new();
    insert_str(&mut body, "image", &service.image);
    insert_str(&mut body, "container_name", &service.container_name);
    body
}

/// Appends environment, volume, device, and capability entries shared by
/// both topologies. Empty lists are omitted entirely.
pub(crate) fn append_runtime_config(body: &mut Mapping, service: &Service) {
    if !service.environment.is_empty() {
        body.insert(
            Value::String("environment".to_string()),
            string_seq(service.environment.iter().cloned()),
        );
    }
    if !service.volumes.is_empty() {
        body.insert(
            Value::String("volumes".to_string()),
            string_seq(service.volumes.iter().map(volume_entry)),
        );
    }
    if !service.devices.is_empty() {
        body.insert(
            Value::String("devices".to_string()),
            string_seq(service.devices.iter().cloned()),
        );
    }
    if !service.cap_add.is_empty() {
        body.insert(
            Value::String("cap_add".to_string()),
            string_seq(service.cap_add.iter().cloned()),
        );
    }
}

/// Serializes the finished document tree.
pub(crate) fn to_yaml(document: &Value) -> Result<String> {
    serde_yaml::to_string(document).map_err(|e| Error::Render(e.to_string()))
}
