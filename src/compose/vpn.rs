//! VPN-mode rendering.

use crate::compose::{
    append_runtime_config, base_body, insert_str, port_entry, string_seq, to_yaml, ComposeStrategy,
};
use crate::error::{Error, Result};
use crate::service::{PortMapping, Service};
use serde_yaml::{Mapping, Value};

/// Renders the stack around a single VPN gateway.
///
/// The set is partitioned into exactly one gateway and the remainder.
/// The gateway publishes the deduplicated union of every other service's
/// declared ports; the others publish nothing and share the gateway's
/// network namespace through `network_mode`. No user-defined network is
/// declared.
///
/// A missing gateway is the render-time mirror of the dependency
/// validator's gateway-presence check; hitting it means the orchestration
/// sequence is broken.
pub struct VpnModeStrategy;

impl ComposeStrategy for VpnModeStrategy {
    fn mode(&self) -> &'static str {
        "vpn"
    }

    fn render(&self, services: &[Service]) -> Result<String> {
        let gateway = services
            .iter()
            .find(|s| s.is_gateway())
            .ok_or(Error::GatewayMissing)?;
        let tunnelled: Vec<&Service> = services.iter().filter(|s| !s.is_gateway()).collect();

        let exposed = exposed_ports(&tunnelled);

        let mut entries = Mapping::new();
        entries.insert(
            Value::String(gateway.id.clone()),
            Value::Mapping(render_gateway(gateway, &exposed)),
        );
        for service in tunnelled {
            entries.insert(
                Value::String(service.id.clone()),
                Value::Mapping(render_tunnelled(service)),
            );
        }

        let mut document = Mapping::new();
        document.insert(Value::String("services".to_string()), Value::Mapping(entries));

        to_yaml(&Value::Mapping(document))
    }
}

/// Union of the tunnelled services' port lists, first occurrence wins.
///
/// Input order is the sorted service order, so the aggregate is as
/// deterministic as the rest of the document.
fn exposed_ports(tunnelled: &[&Service]) -> Vec<PortMapping> {
    let mut exposed: Vec<PortMapping> = Vec::new();
    for service in tunnelled {
        for port in &service.ports {
            if !exposed.contains(port) {
                exposed.push(port.clone());
            }
        }
    }
    exposed
}

fn render_gateway(gateway: &Service, exposed: &[PortMapping]) -> Mapping {
    let mut body = base_body(gateway);
    append_runtime_config(&mut body, gateway);

    if !exposed.is_empty() {
        body.insert(
            Value::String("ports".to_string()),
            string_seq(exposed.iter().map(port_entry)),
        );
    }

    insert_str(&mut body, "restart", &gateway.restart);
    body
}

fn render_tunnelled(service: &Service) -> Mapping {
    let mut body = base_body(service);
    insert_str(&mut body, "network_mode", &service.network.vpn_mode.network_mode);
    append_runtime_config(&mut body, service);
    insert_str(&mut body, "restart", &service.restart);
    body
}
